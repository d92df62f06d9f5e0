//! Headless path query
//!
//! Loads an ASCII layout (cell coordinates, `S`/`T` markers as defaults) or a
//! JSON world map (world coordinates, grid from config.toml) and prints the
//! path found between two points.

use gridpath::classifier::TerrainPenalties;
use gridpath::config::{Config, CONFIG_FILE};
use gridpath::logging::init_logging;
use gridpath::point::{format_waypoints, path_length};
use gridpath::{find_path, Grid, Layout, WorldMap, WorldPoint};
use serde_json::json;
use std::env;
use std::error::Error;
use std::path::Path;
use std::process;
use tracing::warn;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <layout.txt|map.json> [sx sy tx ty] [--json]", program);
    eprintln!("Layout coordinates are cell columns/rows; map coordinates are world units.");
    process::exit(1);
}

fn parse_coords(args: &[String]) -> Result<Option<[f32; 4]>, Box<dyn Error>> {
    match args.len() {
        0 => Ok(None),
        4 => {
            let mut coords = [0.0; 4];
            for (slot, arg) in coords.iter_mut().zip(args) {
                *slot = arg.parse::<f32>()?;
            }
            Ok(Some(coords))
        }
        n => Err(format!("expected 4 coordinates, got {}", n).into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);
    let as_json = args.iter().any(|a| a == "--json");
    args.retain(|a| a != "--json");
    if args.is_empty() {
        usage(&program);
    }

    let (config, config_error) = match Config::load_from(Path::new(CONFIG_FILE)) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(&config.logging).map_err(|e| e.to_string())?;
    if let Some(e) = config_error {
        warn!(error = %e, "using default configuration");
    }

    let map_path = Path::new(&args[0]);
    let coords = parse_coords(&args[1..])?;
    let penalties = TerrainPenalties::from_config(&config.terrain);

    let (mut grid, start, target): (Grid, WorldPoint, WorldPoint) =
        if map_path.extension().and_then(|s| s.to_str()) == Some("json") {
            let map = WorldMap::load_json(map_path)?;
            let grid = Grid::new(&config.grid, &map.classifier(&penalties))?;
            let Some([sx, sy, tx, ty]) = coords else {
                return Err("JSON maps need explicit coordinates".into());
            };
            (grid, WorldPoint::new(sx, sy), WorldPoint::new(tx, ty))
        } else {
            let layout = Layout::load(map_path, config.grid.node_radius * 2.0)?;
            let grid = layout.build_grid(&penalties)?;
            let (start, target) = match coords {
                Some([sx, sy, tx, ty]) => (
                    layout.cell_center(sx as i32, sy as i32),
                    layout.cell_center(tx as i32, ty as i32),
                ),
                None => match (layout.start, layout.target) {
                    (Some((sx, sy)), Some((tx, ty))) => {
                        (layout.cell_center(sx, sy), layout.cell_center(tx, ty))
                    }
                    _ => return Err("layout has no S/T markers; pass coordinates".into()),
                },
            };
            (grid, start, target)
        };

    let result = find_path(&mut grid, start, target);

    if as_json {
        let output = json!({
            "success": result.success,
            "cost": result.cost,
            "failure": result.failure.map(|f| format!("{:?}", f)),
            "cells_expanded": result.cells_expanded,
            "waypoints": result.waypoints,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", grid.render_ascii(&result.path_cells));
        println!();
        if result.success {
            println!("Waypoints: {}", format_waypoints(&result.waypoints));
            println!(
                "Cost: {}, length: {:.2}, expanded: {} cells",
                result.cost,
                path_length(start, &result.waypoints),
                result.cells_expanded
            );
        } else {
            println!("No path ({:?})", result.failure);
        }
    }

    Ok(())
}
