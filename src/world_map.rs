//! Map descriptions that implement [`Classifier`].
//!
//! A [`WorldMap`] is a flat list of obstacle rectangles and terrain regions.
//! It can be stored as JSON or drawn as an ASCII [`Layout`]:
//!
//! ```text
//! S....
//! ..#..
//! .11#.
//! ....T
//! ```
//!
//! `#` blocked, `.` free, `0`-`9` free cell on that terrain layer,
//! `S`/`T` free cells marking a start and a target. Row 0 is the first line.

use crate::classifier::{Classifier, TerrainPenalties};
use crate::config::GridConfig;
use crate::error::MapError;
use crate::grid::Grid;
use crate::point::WorldPoint;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// Discs that only touch an obstacle edge are not blocked by it
const CONTACT_EPSILON: f32 = 1e-4;

/// Axis-aligned rectangle in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Rect {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Rect { min_x, min_y, max_x, max_y }
    }

    pub fn contains(&self, point: WorldPoint) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    /// Whether a disc overlaps this rectangle with positive area
    pub fn overlaps_disc(&self, center: WorldPoint, radius: f32) -> bool {
        let nearest = WorldPoint::new(
            center.x.clamp(self.min_x, self.max_x),
            center.y.clamp(self.min_y, self.max_y),
        );
        let reach = (radius - CONTACT_EPSILON).max(0.0);
        if reach == 0.0 {
            return self.contains(center);
        }
        nearest.distance_squared(&center) < reach * reach
    }
}

/// A patch of ground on one terrain layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainRegion {
    pub layer: u32,
    pub area: Rect,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldMap {
    #[serde(default)]
    pub obstacles: Vec<Rect>,
    /// Later regions are drawn over earlier ones
    #[serde(default)]
    pub regions: Vec<TerrainRegion>,
}

impl WorldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Terrain layer at `position`, if any region covers it
    pub fn layer_at(&self, position: WorldPoint) -> Option<u32> {
        self.regions
            .iter()
            .rev()
            .find(|region| region.area.contains(position))
            .map(|region| region.layer)
    }

    pub fn blocked_at(&self, position: WorldPoint, radius: f32) -> bool {
        self.obstacles
            .iter()
            .any(|obstacle| obstacle.overlaps_disc(position, radius))
    }

    /// Pair this map with a penalty table to classify grid cells
    pub fn classifier<'a>(&'a self, penalties: &'a TerrainPenalties) -> MapClassifier<'a> {
        MapClassifier { map: self, penalties }
    }

    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_json(path: &Path) -> Result<Self, MapError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn save_json(&self, path: &Path) -> Result<(), MapError> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

/// [`Classifier`] backed by a [`WorldMap`] and a terrain penalty table
#[derive(Debug, Clone, Copy)]
pub struct MapClassifier<'a> {
    map: &'a WorldMap,
    penalties: &'a TerrainPenalties,
}

impl Classifier for MapClassifier<'_> {
    fn is_walkable(&self, position: WorldPoint, radius: f32) -> bool {
        !self.map.blocked_at(position, radius)
    }

    fn penalty_for(&self, position: WorldPoint) -> u32 {
        self.map
            .layer_at(position)
            .map(|layer| self.penalties.get(layer))
            .unwrap_or(0)
    }
}

/// A map drawn on a character grid, plus the markers found in it
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub map: WorldMap,
    pub cols: i32,
    pub rows: i32,
    pub cell_size: f32,
    pub start: Option<(i32, i32)>,
    pub target: Option<(i32, i32)>,
}

impl Layout {
    /// Parse an ASCII layout; each character is one cell of `cell_size`.
    ///
    /// Blank lines and lines starting with `;` are skipped so fixture files
    /// can carry comments.
    pub fn parse(text: &str, cell_size: f32) -> Result<Self, MapError> {
        let lines: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with(';'))
            .collect();

        let Some(&(_, first)) = lines.first() else {
            return Err(MapError::Layout {
                line: 0,
                message: "layout has no rows".to_string(),
            });
        };
        let cols = first.chars().count() as i32;
        let rows = lines.len() as i32;

        let mut map = WorldMap::new();
        let mut start = None;
        let mut target = None;

        for (y, (line_no, line)) in lines.iter().enumerate() {
            if line.chars().count() as i32 != cols {
                return Err(MapError::Layout {
                    line: *line_no,
                    message: format!("expected {} columns, found {}", cols, line.chars().count()),
                });
            }

            let y = y as i32;
            let mut wall_run: Option<i32> = None;
            for (x, ch) in line.chars().enumerate() {
                let x = x as i32;
                match ch {
                    '#' => {
                        wall_run.get_or_insert(x);
                        continue;
                    }
                    '.' => {}
                    'S' => start = Some((x, y)),
                    'T' => target = Some((x, y)),
                    '0'..='9' => map.regions.push(TerrainRegion {
                        layer: ch.to_digit(10).unwrap_or(0),
                        area: cell_rect(x, y, 1, cell_size),
                    }),
                    other => {
                        return Err(MapError::Layout {
                            line: *line_no,
                            message: format!("unexpected character '{}' at column {}", other, x + 1),
                        });
                    }
                }
                if let Some(run_start) = wall_run.take() {
                    map.obstacles.push(cell_rect(run_start, y, x - run_start, cell_size));
                }
            }
            if let Some(run_start) = wall_run {
                map.obstacles.push(cell_rect(run_start, y, cols - run_start, cell_size));
            }
        }

        Ok(Layout {
            map,
            cols,
            rows,
            cell_size,
            start,
            target,
        })
    }

    pub fn load(path: &Path, cell_size: f32) -> Result<Self, MapError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text, cell_size)
    }

    /// Grid configuration whose cells line up with the layout's characters
    pub fn grid_config(&self) -> GridConfig {
        let world_width = self.cols as f32 * self.cell_size;
        let world_height = self.rows as f32 * self.cell_size;
        GridConfig {
            world_width,
            world_height,
            center_x: world_width / 2.0,
            center_y: world_height / 2.0,
            node_radius: self.cell_size / 2.0,
        }
    }

    pub fn build_grid(&self, penalties: &TerrainPenalties) -> Result<Grid, MapError> {
        Ok(Grid::new(&self.grid_config(), &self.map.classifier(penalties))?)
    }

    /// World position of the centre of layout cell (x, y)
    pub fn cell_center(&self, x: i32, y: i32) -> WorldPoint {
        WorldPoint::new(
            (x as f32 + 0.5) * self.cell_size,
            (y as f32 + 0.5) * self.cell_size,
        )
    }
}

fn cell_rect(x: i32, y: i32, width: i32, cell_size: f32) -> Rect {
    Rect::new(
        x as f32 * cell_size,
        y as f32 * cell_size,
        (x + width) as f32 * cell_size,
        (y + 1) as f32 * cell_size,
    )
}
