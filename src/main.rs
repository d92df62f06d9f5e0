use arboard::Clipboard;
use gridpath::classifier::TerrainPenalties;
use gridpath::config::{Config, CONFIG_FILE};
use gridpath::logging::init_logging;
use gridpath::{CellId, Grid, Layout, RequestQueue, WorldMap, WorldPoint};
use macroquad::prelude::*;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tracing::{error, info, warn};

const FALLBACK_LAYOUT: &str = "\
..............................
..............................
.....#########................
.............#......1111......
.............#......1111......
.............#......1111......
..22222......#................
..22222......#######..........
..22222.......................
..............................
..................#...........
..................#...........
..........#########...........
..............................
..............................
";

/// Completed request as seen by the viewer
struct ViewerPath {
    from: WorldPoint,
    waypoints: Vec<WorldPoint>,
    success: bool,
}

/// Visualization state
struct VisState {
    queue: RequestQueue,
    start: Option<CellId>,
    target: Option<CellId>,
    latest: Rc<RefCell<Option<ViewerPath>>>,
    cell_pixels: f32,
    step_budget: usize,
    background: Color,
}

impl VisState {
    fn new(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let penalties = TerrainPenalties::from_config(&config.terrain);
        let grid = load_grid(config, &penalties)?;
        info!(
            size_x = grid.size_x(),
            size_y = grid.size_y(),
            "grid ready"
        );

        Ok(VisState {
            queue: RequestQueue::new(grid),
            start: None,
            target: None,
            latest: Rc::new(RefCell::new(None)),
            cell_pixels: config.visual.cell_pixels,
            step_budget: config.search.step_budget,
            background: Color::from_rgba(
                config.visual.background_r,
                config.visual.background_g,
                config.visual.background_b,
                255,
            ),
        })
    }

    fn cell_under_mouse(&self) -> Option<CellId> {
        let (mouse_x, mouse_y) = mouse_position();
        let grid_x = (mouse_x / self.cell_pixels).floor() as i32;
        let grid_y = (mouse_y / self.cell_pixels).floor() as i32;
        let grid = self.queue.grid();
        grid.in_bounds(grid_x, grid_y).then(|| grid.get_id(grid_x, grid_y))
    }

    fn handle_click(&mut self) {
        let Some(id) = self.cell_under_mouse() else {
            return;
        };

        // Left click: set start, right click: set target and request a path
        if is_mouse_button_pressed(MouseButton::Left) {
            self.start = Some(id);
        } else if is_mouse_button_pressed(MouseButton::Right) {
            self.target = Some(id);
        }

        if let (Some(start), Some(target)) = (self.start, self.target) {
            let from = self.queue.grid().cell(start).world_position;
            let to = self.queue.grid().cell(target).world_position;
            let latest = Rc::clone(&self.latest);
            self.queue.submit(from, to, move |waypoints, success| {
                *latest.borrow_mut() = Some(ViewerPath {
                    from,
                    waypoints,
                    success,
                });
            });
        }
    }

    fn copy_to_clipboard(&self) {
        let latest = self.latest.borrow();
        let Some(path) = latest.as_ref() else {
            info!("no path to copy yet");
            return;
        };
        let json = match serde_json::to_string_pretty(&path.waypoints) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize waypoints");
                return;
            }
        };
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(json) {
                    warn!(error = %e, "failed to copy to clipboard");
                } else {
                    info!(waypoints = path.waypoints.len(), "waypoints copied to clipboard");
                    // Keep clipboard alive for a moment to ensure clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to access clipboard");
            }
        }
    }

    fn screen_center(&self, grid: &Grid, point: WorldPoint) -> Vec2 {
        let (x, y) = grid.get_coords(grid.cell_from_world_point(point));
        vec2(
            (x as f32 + 0.5) * self.cell_pixels,
            (y as f32 + 0.5) * self.cell_pixels,
        )
    }

    fn draw(&self) {
        clear_background(self.background);
        let grid = self.queue.grid();

        for cell in grid.cells() {
            let px = cell.grid_x as f32 * self.cell_pixels;
            let py = cell.grid_y as f32 * self.cell_pixels;
            let color = if !cell.walkable {
                RED
            } else if cell.movement_penalty > 0 {
                let shade = (cell.movement_penalty.min(50) * 3) as u8;
                Color::from_rgba(90, 90u8.saturating_add(shade), 60, 255)
            } else {
                Color::from_rgba(60, 60, 60, 255)
            };
            draw_rectangle(px, py, self.cell_pixels - 1.0, self.cell_pixels - 1.0, color);
        }

        for (marker, color) in [(self.start, BLUE), (self.target, GOLD)] {
            if let Some(id) = marker {
                let center = self.screen_center(grid, grid.cell(id).world_position);
                draw_circle(center.x, center.y, self.cell_pixels * 0.35, color);
            }
        }

        let latest = self.latest.borrow();
        let status = match latest.as_ref() {
            Some(path) if path.success => {
                let mut previous = self.screen_center(grid, path.from);
                for waypoint in &path.waypoints {
                    let next = self.screen_center(grid, *waypoint);
                    draw_line(previous.x, previous.y, next.x, next.y, 3.0, GREEN);
                    draw_circle(next.x, next.y, 4.0, GREEN);
                    previous = next;
                }
                format!("Path: {} waypoints", path.waypoints.len())
            }
            Some(_) => "Path: none".to_string(),
            None => "Path: -".to_string(),
        };

        let info = format!(
            "{}\nQueued: {}{}\nLeft click: start\nRight click: target\nC: copy waypoints\nEsc: close window",
            status,
            self.queue.pending(),
            if self.queue.is_processing() { " (searching)" } else { "" },
        );
        draw_text(&info, 10.0, 20.0, 20.0, WHITE);
    }
}

fn load_grid(config: &Config, penalties: &TerrainPenalties) -> Result<Grid, Box<dyn std::error::Error>> {
    let path = Path::new(&config.map.path);
    let cell_size = config.grid.node_radius * 2.0;

    if path.extension().and_then(|s| s.to_str()) == Some("json") {
        let map = WorldMap::load_json(path)?;
        return Ok(Grid::new(&config.grid, &map.classifier(penalties))?);
    }

    let layout = match Layout::load(path, cell_size) {
        Ok(layout) => layout,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "map not loaded, using built-in layout");
            Layout::parse(FALLBACK_LAYOUT, cell_size)?
        }
    };
    Ok(layout.build_grid(penalties)?)
}

fn load_config() -> (Config, Option<String>) {
    match Config::load_from(Path::new(CONFIG_FILE)) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e.to_string())),
    }
}

fn window_conf() -> Conf {
    let (config, _) = load_config();
    Conf {
        window_title: config.visual.window_title,
        window_width: 900,
        window_height: 700,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let (config, config_error) = load_config();
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    match config_error {
        Some(e) => warn!(error = %e, "using default configuration"),
        None => info!("loaded configuration from {}", CONFIG_FILE),
    }

    let mut state = match VisState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build grid");
            return;
        }
    };

    loop {
        if is_mouse_button_pressed(MouseButton::Left) || is_mouse_button_pressed(MouseButton::Right) {
            state.handle_click();
        }

        // Copy waypoints to clipboard on C key
        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }

        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        // Searches advance a bounded number of cells per frame
        state.queue.process(state.step_budget);
        state.draw();

        next_frame().await
    }
}
