use crate::cell::{Cell, CellId};
use crate::classifier::Classifier;
use crate::config::GridConfig;
use crate::error::GridError;
use crate::point::WorldPoint;

/// Dense row-major grid of cells covering a rectangle of the world
#[derive(Debug, Clone)]
pub struct Grid {
    size_x: i32,
    size_y: i32,
    node_radius: f32,
    world_width: f32,
    world_height: f32,
    center: WorldPoint,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid and classify every cell.
    ///
    /// The penalty classifier is only consulted for walkable cells.
    pub fn new<C: Classifier + ?Sized>(config: &GridConfig, classifier: &C) -> Result<Self, GridError> {
        if !(config.node_radius > 0.0) {
            return Err(GridError::InvalidRadius(config.node_radius));
        }
        if !(config.world_width > 0.0) || !(config.world_height > 0.0) {
            return Err(GridError::InvalidWorldSize {
                width: config.world_width,
                height: config.world_height,
            });
        }

        let diameter = config.node_radius * 2.0;
        let size_x = (config.world_width / diameter).round() as i32;
        let size_y = (config.world_height / diameter).round() as i32;
        if size_x < 1 || size_y < 1 {
            return Err(GridError::EmptyGrid {
                width: config.world_width,
                height: config.world_height,
                diameter,
            });
        }
        // Cell ids are computed as x + y * size_x in i32
        let cell_count = size_x
            .checked_mul(size_y)
            .ok_or(GridError::TooManyCells { size_x, size_y })?;

        let center = WorldPoint::new(config.center_x, config.center_y);
        let lower_left = WorldPoint::new(
            center.x - config.world_width / 2.0,
            center.y - config.world_height / 2.0,
        );

        let mut cells = Vec::with_capacity(cell_count as usize);
        for y in 0..size_y {
            for x in 0..size_x {
                let world_position = WorldPoint::new(
                    lower_left.x + x as f32 * diameter + config.node_radius,
                    lower_left.y + y as f32 * diameter + config.node_radius,
                );
                let walkable = classifier.is_walkable(world_position, config.node_radius);
                let movement_penalty = if walkable {
                    classifier.penalty_for(world_position)
                } else {
                    0
                };
                cells.push(Cell::new(walkable, world_position, x, y, movement_penalty));
            }
        }

        Ok(Grid {
            size_x,
            size_y,
            node_radius: config.node_radius,
            world_width: config.world_width,
            world_height: config.world_height,
            center,
            cells,
        })
    }

    pub fn size_x(&self) -> i32 {
        self.size_x
    }

    pub fn size_y(&self) -> i32 {
        self.size_y
    }

    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    pub fn node_diameter(&self) -> f32 {
        self.node_radius * 2.0
    }

    /// Total cell count; an upper bound on open-set membership
    pub fn max_size(&self) -> usize {
        self.cells.len()
    }

    /// Convert (x, y) coordinates to cell ID
    pub fn get_id(&self, x: i32, y: i32) -> CellId {
        (x + y * self.size_x) as CellId
    }

    /// Convert cell ID to (x, y) coordinates
    pub fn get_coords(&self, id: CellId) -> (i32, i32) {
        let id = id as i32;
        (id % self.size_x, id / self.size_x)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.size_x && y >= 0 && y < self.size_y
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id]
    }

    pub fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id]
    }

    /// Cell at (x, y), or `None` outside the grid
    pub fn cell_at(&self, x: i32, y: i32) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.get_id(x, y)])
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Map a world position to the cell covering it.
    ///
    /// Positions outside the grid clamp to the nearest edge cell.
    pub fn cell_from_world_point(&self, position: WorldPoint) -> CellId {
        let percent_x = (position.x - self.center.x + self.world_width / 2.0) / self.world_width;
        let percent_y = (position.y - self.center.y + self.world_height / 2.0) / self.world_height;
        let percent_x = percent_x.clamp(0.0, 1.0);
        let percent_y = percent_y.clamp(0.0, 1.0);

        let x = (((self.size_x - 1) as f32) * percent_x).round() as i32;
        let y = (((self.size_y - 1) as f32) * percent_y).round() as i32;
        self.get_id(x.clamp(0, self.size_x - 1), y.clamp(0, self.size_y - 1))
    }

    /// The up-to-8 in-bounds cells around `id`, walkable or not
    pub fn neighbours(&self, id: CellId) -> Vec<CellId> {
        let (cell_x, cell_y) = self.get_coords(id);
        let mut neighbours = Vec::with_capacity(8);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let check_x = cell_x + dx;
                let check_y = cell_y + dy;
                if self.in_bounds(check_x, check_y) {
                    neighbours.push(self.get_id(check_x, check_y));
                }
            }
        }
        neighbours
    }

    /// Text rendering of the grid, one line per row starting at y = 0.
    ///
    /// `#` blocked, `.` free, `~` penalised, `*` marked.
    pub fn render_ascii(&self, marked: &[CellId]) -> String {
        let mut result = String::new();
        for y in 0..self.size_y {
            for x in 0..self.size_x {
                let id = self.get_id(x, y);
                let cell = &self.cells[id];
                let symbol = if marked.contains(&id) {
                    '*'
                } else if !cell.walkable {
                    '#'
                } else if cell.movement_penalty > 0 {
                    '~'
                } else {
                    '.'
                };
                result.push(symbol);
            }
            result.push('\n');
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{FnClassifier, OpenTerrain};
    use std::cell::Cell as Counter;

    fn unit_config(cols: f32, rows: f32) -> GridConfig {
        GridConfig {
            world_width: cols,
            world_height: rows,
            center_x: cols / 2.0,
            center_y: rows / 2.0,
            node_radius: 0.5,
        }
    }

    #[test]
    fn test_dimensions_and_cell_centres() {
        let grid = Grid::new(&unit_config(5.0, 3.0), &OpenTerrain).unwrap();
        assert_eq!(grid.size_x(), 5);
        assert_eq!(grid.size_y(), 3);
        assert_eq!(grid.max_size(), 15);

        let cell = grid.cell(grid.get_id(4, 2));
        assert_eq!(cell.world_position, WorldPoint::new(4.5, 2.5));
        assert_eq!((cell.grid_x, cell.grid_y), (4, 2));
    }

    #[test]
    fn test_world_point_maps_to_covering_cell() {
        let grid = Grid::new(&unit_config(5.0, 5.0), &OpenTerrain).unwrap();
        for y in 0..5 {
            for x in 0..5 {
                let id = grid.get_id(x, y);
                let centre = grid.cell(id).world_position;
                assert_eq!(grid.cell_from_world_point(centre), id);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_positions_clamp_to_edge() {
        let grid = Grid::new(&unit_config(5.0, 5.0), &OpenTerrain).unwrap();
        assert_eq!(grid.cell_from_world_point(WorldPoint::new(-100.0, -3.0)), grid.get_id(0, 0));
        assert_eq!(grid.cell_from_world_point(WorldPoint::new(99.0, 2.5)), grid.get_id(4, 2));
        assert_eq!(grid.cell_from_world_point(WorldPoint::new(2.5, 1e9)), grid.get_id(2, 4));
    }

    #[test]
    fn test_neighbour_counts() {
        let grid = Grid::new(&unit_config(3.0, 3.0), &OpenTerrain).unwrap();
        assert_eq!(grid.neighbours(grid.get_id(1, 1)).len(), 8);
        assert_eq!(grid.neighbours(grid.get_id(0, 0)).len(), 3);
        assert_eq!(grid.neighbours(grid.get_id(1, 0)).len(), 5);
        assert!(!grid.neighbours(grid.get_id(1, 1)).contains(&grid.get_id(1, 1)));
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbours() {
        let grid = Grid::new(&unit_config(1.0, 1.0), &OpenTerrain).unwrap();
        assert_eq!(grid.max_size(), 1);
        assert!(grid.neighbours(0).is_empty());
        assert_eq!(grid.cell_from_world_point(WorldPoint::new(7.0, -7.0)), 0);
    }

    #[test]
    fn test_penalty_skipped_for_blocked_cells() {
        let penalty_calls = Counter::new(0);
        let classifier = FnClassifier::new(
            |p: WorldPoint, _r: f32| p.x > 1.0,
            |_p: WorldPoint| {
                penalty_calls.set(penalty_calls.get() + 1);
                3
            },
        );
        let grid = Grid::new(&unit_config(2.0, 2.0), &classifier).unwrap();

        assert_eq!(penalty_calls.get(), 2);
        assert!(!grid.cell(grid.get_id(0, 0)).walkable);
        assert_eq!(grid.cell(grid.get_id(0, 0)).movement_penalty, 0);
        assert_eq!(grid.cell(grid.get_id(1, 1)).movement_penalty, 3);
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let mut config = unit_config(5.0, 5.0);
        config.node_radius = 0.0;
        assert_eq!(Grid::new(&config, &OpenTerrain).unwrap_err(), GridError::InvalidRadius(0.0));

        let mut config = unit_config(5.0, 5.0);
        config.world_height = -1.0;
        assert!(matches!(
            Grid::new(&config, &OpenTerrain),
            Err(GridError::InvalidWorldSize { .. })
        ));

        let mut config = unit_config(0.4, 5.0);
        config.node_radius = 0.5;
        assert!(matches!(Grid::new(&config, &OpenTerrain), Err(GridError::EmptyGrid { .. })));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let config = unit_config(1.0e6, 1.0e6);
        assert_eq!(
            Grid::new(&config, &OpenTerrain).unwrap_err(),
            GridError::TooManyCells {
                size_x: 1_000_000,
                size_y: 1_000_000
            }
        );
    }
}
