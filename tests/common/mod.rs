#![allow(dead_code)]

use gridpath::classifier::{OpenTerrain, TerrainPenalties};
use gridpath::config::GridConfig;
use gridpath::pathfinding::PathResult;
use gridpath::{CellId, Grid, Layout, WorldPoint};
use std::fs;
use std::path::Path;

/// Grid of `cols` x `rows` unit cells with its lower-left corner at the origin
pub fn open_grid(cols: i32, rows: i32) -> Grid {
    let config = GridConfig {
        world_width: cols as f32,
        world_height: rows as f32,
        center_x: cols as f32 / 2.0,
        center_y: rows as f32 / 2.0,
        node_radius: 0.5,
    };
    Grid::new(&config, &OpenTerrain).expect("valid grid")
}

/// Parse a layout with unit cells and build its grid
pub fn layout_grid(text: &str, penalties: &TerrainPenalties) -> (Grid, Layout) {
    let layout = Layout::parse(text, 1.0).expect("valid layout");
    let grid = layout.build_grid(penalties).expect("valid grid");
    (grid, layout)
}

/// World position of the centre of unit cell (x, y)
pub fn center(x: i32, y: i32) -> WorldPoint {
    WorldPoint::new(x as f32 + 0.5, y as f32 + 0.5)
}

/// Base cost between two cells on an obstacle-free, penalty-free grid
pub fn octile(dx: i32, dy: i32) -> u32 {
    let dx = dx.unsigned_abs();
    let dy = dy.unsigned_abs();
    14 * dx.min(dy) + 10 * (dx.max(dy) - dx.min(dy))
}

pub fn waypoint_coords(grid: &Grid, result: &PathResult) -> Vec<(i32, i32)> {
    result
        .waypoints
        .iter()
        .map(|p| grid.get_coords(grid.cell_from_world_point(*p)))
        .collect()
}

/// Walk straight 8-directional segments from `start` through each waypoint
/// cell, returning every cell visited (start included)
pub fn walk_waypoints(grid: &Grid, start: CellId, waypoints: &[CellId]) -> Vec<CellId> {
    let mut cells = vec![start];
    let (mut x, mut y) = grid.get_coords(start);
    for &waypoint in waypoints {
        let (wx, wy) = grid.get_coords(waypoint);
        let (dx, dy) = (wx - x, wy - y);
        assert!(
            dx == 0 || dy == 0 || dx.abs() == dy.abs(),
            "segment ({},{}) -> ({},{}) is not a straight 8-directional run",
            x, y, wx, wy
        );
        while (x, y) != (wx, wy) {
            x += (wx - x).signum();
            y += (wy - y).signum();
            cells.push(grid.get_id(x, y));
        }
    }
    cells
}

/// Sum of step costs and entry penalties along a full cell path
pub fn path_cost(grid: &Grid, path: &[CellId]) -> u32 {
    path.windows(2)
        .map(|pair| {
            let (ax, ay) = grid.get_coords(pair[0]);
            let (bx, by) = grid.get_coords(pair[1]);
            octile(bx - ax, by - ay) + grid.cell(pair[1]).movement_penalty
        })
        .sum()
}

/// Visualize a path on a grid
pub fn visualize_path(grid: &Grid, result: &PathResult) -> String {
    let mut out = format!(
        "success={} cost={} waypoints={:?}\n",
        result.success,
        result.cost,
        waypoint_coords(grid, result)
    );
    out.push_str(&grid.render_ascii(&result.path_cells));
    out
}

/// A layout fixture with its expected cost (`None` means no path)
pub struct LayoutFixture {
    pub name: String,
    pub text: String,
    pub expected_cost: Option<u32>,
    pub penalties: TerrainPenalties,
}

/// Load a fixture file. Header comments:
/// `; cost: <n>` or `; cost: none`, and `; penalty: <layer> <value>`
pub fn load_fixture(path: &Path) -> Result<LayoutFixture, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let mut expected_cost = None;
    let mut cost_seen = false;
    let mut penalties = TerrainPenalties::new();

    for line in text.lines() {
        let Some(comment) = line.strip_prefix(';') else {
            continue;
        };
        let comment = comment.trim();
        if let Some(value) = comment.strip_prefix("cost:") {
            let value = value.trim();
            cost_seen = true;
            if value != "none" {
                expected_cost = Some(value.parse()?);
            }
        } else if let Some(value) = comment.strip_prefix("penalty:") {
            let parts: Vec<&str> = value.split_whitespace().collect();
            if parts.len() != 2 {
                return Err(format!("bad penalty line: {}", line).into());
            }
            penalties.set(parts[0].parse()?, parts[1].parse()?);
        }
    }

    if !cost_seen {
        return Err("fixture has no '; cost:' header".into());
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();
    Ok(LayoutFixture {
        name,
        text,
        expected_cost,
        penalties,
    })
}

fn is_layout_row(line: &str) -> bool {
    !line.trim().is_empty() && !line.starts_with(';')
}

/// Mirror a layout left to right, leaving comment lines alone
pub fn flip_layout_horizontal(text: &str) -> String {
    text.lines()
        .map(|line| {
            if is_layout_row(line) {
                line.trim_end().chars().rev().collect::<String>()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mirror a layout top to bottom, leaving comment lines alone
pub fn flip_layout_vertical(text: &str) -> String {
    let comments: Vec<&str> = text.lines().filter(|l| !is_layout_row(l)).collect();
    let rows: Vec<&str> = text.lines().filter(|l| is_layout_row(l)).collect();
    comments
        .into_iter()
        .chain(rows.into_iter().rev())
        .collect::<Vec<_>>()
        .join("\n")
}
