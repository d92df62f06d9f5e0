use crate::cell::{Cell, CellId};
use crate::grid::Grid;
use crate::heap::Heap;
use crate::point::WorldPoint;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, trace};

/// Cost of an orthogonal step; a diagonal step costs `DIAGONAL_COST`
pub const ORTHOGONAL_COST: u32 = 10;
pub const DIAGONAL_COST: u32 = 14;

/// Why a search produced no path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathFailure {
    /// The start position lies in a blocked cell
    StartBlocked,
    /// The target position lies in a blocked cell
    TargetBlocked,
    /// Every reachable cell was examined without reaching the target
    NoPath,
}

/// Progress of a [`PathSearch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Searching,
    Found,
    Failed(PathFailure),
}

/// Outcome of a completed search
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Simplified waypoints from the first step to the target; the start is not included
    pub waypoints: Vec<WorldPoint>,
    pub success: bool,
    /// Cost of the path under the 14/10 step model plus movement penalties,
    /// saturating at `u32::MAX`
    pub cost: u32,
    /// Every cell of the path, start first, before simplification
    pub path_cells: Vec<CellId>,
    pub cells_expanded: usize,
    pub cells_opened: usize,
    pub failure: Option<PathFailure>,
}

impl PathResult {
    fn failed(reason: PathFailure, cells_expanded: usize, cells_opened: usize) -> Self {
        PathResult {
            waypoints: Vec::new(),
            success: false,
            cost: 0,
            path_cells: Vec::new(),
            cells_expanded,
            cells_opened,
            failure: Some(reason),
        }
    }
}

/// Octile distance between two cells: diagonal steps while both axes
/// differ, orthogonal steps for the remainder.
///
/// Used both as the step cost between neighbours and as the heuristic.
/// Movement penalties are not part of the estimate.
pub fn get_distance(a: &Cell, b: &Cell) -> u32 {
    let dx = (a.grid_x - b.grid_x).unsigned_abs();
    let dy = (a.grid_y - b.grid_y).unsigned_abs();
    let (short, long) = if dx > dy { (dy, dx) } else { (dx, dy) };
    DIAGONAL_COST
        .saturating_mul(short)
        .saturating_add(ORTHOGONAL_COST.saturating_mul(long - short))
}

/// An A* search that can be advanced one expansion at a time.
///
/// The search keeps its open and closed sets but not the grid: every call
/// takes the grid it was created on. Transient cell state (costs, parents,
/// heap slots) belongs to this search until it finishes, so the grid must
/// not be searched or modified by anyone else in between. Only the start
/// cell is reset up front. Other cells keep values from earlier searches,
/// but `g_cost` is only compared for cells already in this search's open
/// set, and parents are only followed from cells this search discovered.
#[derive(Debug)]
pub struct PathSearch {
    start: CellId,
    target: CellId,
    open_set: Heap,
    closed_set: HashSet<CellId>,
    status: SearchStatus,
    cells_expanded: usize,
    cells_opened: usize,
    started_at: Instant,
}

impl PathSearch {
    pub fn new(grid: &mut Grid, start_pos: WorldPoint, target_pos: WorldPoint) -> Self {
        let start = grid.cell_from_world_point(start_pos);
        let target = grid.cell_from_world_point(target_pos);
        let mut search = PathSearch {
            start,
            target,
            open_set: Heap::new(grid.max_size()),
            closed_set: HashSet::new(),
            status: SearchStatus::Searching,
            cells_expanded: 0,
            cells_opened: 0,
            started_at: Instant::now(),
        };

        if !grid.cell(start).walkable {
            search.status = SearchStatus::Failed(PathFailure::StartBlocked);
        } else if !grid.cell(target).walkable {
            search.status = SearchStatus::Failed(PathFailure::TargetBlocked);
        } else {
            let h_cost = get_distance(grid.cell(start), grid.cell(target));
            let start_cell = grid.cell_mut(start);
            start_cell.g_cost = 0;
            start_cell.h_cost = h_cost;
            start_cell.parent = None;
            search.open_set.insert(grid.cells_mut(), start);
            search.cells_opened = 1;
        }

        trace!(start, target, status = ?search.status, "path search created");
        search
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn start_cell(&self) -> CellId {
        self.start
    }

    pub fn target_cell(&self) -> CellId {
        self.target
    }

    pub fn cells_expanded(&self) -> usize {
        self.cells_expanded
    }

    /// Expand one cell. Returns the status after the expansion; once the
    /// search has finished further calls do nothing.
    pub fn step(&mut self, grid: &mut Grid) -> SearchStatus {
        if self.status != SearchStatus::Searching {
            return self.status;
        }
        debug_assert_eq!(grid.max_size(), self.open_set.capacity());

        let Some(current) = self.open_set.remove_first(grid.cells_mut()) else {
            self.status = SearchStatus::Failed(PathFailure::NoPath);
            self.log_finish(grid);
            return self.status;
        };
        self.closed_set.insert(current);
        self.cells_expanded += 1;

        if current == self.target {
            self.status = SearchStatus::Found;
            self.log_finish(grid);
            return self.status;
        }

        for neighbour in grid.neighbours(current) {
            let neighbour_cell = grid.cell(neighbour);
            if !neighbour_cell.walkable || self.closed_set.contains(&neighbour) {
                continue;
            }

            let current_cell = grid.cell(current);
            // Penalties may be anything up to u32::MAX
            let new_cost = current_cell
                .g_cost
                .saturating_add(get_distance(current_cell, neighbour_cell))
                .saturating_add(neighbour_cell.movement_penalty);
            let in_open_set = self.open_set.contains(grid.cells(), neighbour);

            if new_cost < neighbour_cell.g_cost || !in_open_set {
                let h_cost = get_distance(neighbour_cell, grid.cell(self.target));
                let cell = grid.cell_mut(neighbour);
                cell.g_cost = new_cost;
                cell.h_cost = h_cost;
                cell.parent = Some(current);

                if in_open_set {
                    self.open_set.update_item(grid.cells_mut(), neighbour);
                } else {
                    self.open_set.insert(grid.cells_mut(), neighbour);
                    self.cells_opened += 1;
                }
            }
        }

        self.status
    }

    /// Step until the search finishes
    pub fn run(&mut self, grid: &mut Grid) -> SearchStatus {
        while self.step(grid) == SearchStatus::Searching {}
        self.status
    }

    /// Finish the search if needed and build its result
    pub fn into_result(mut self, grid: &mut Grid) -> PathResult {
        match self.run(grid) {
            SearchStatus::Found => {
                let path_cells = retrace_path(grid, self.start, self.target);
                let waypoints = simplify_path(grid, &path_cells)
                    .into_iter()
                    .map(|id| grid.cell(id).world_position)
                    .collect();
                PathResult {
                    waypoints,
                    success: true,
                    cost: grid.cell(self.target).g_cost,
                    path_cells,
                    cells_expanded: self.cells_expanded,
                    cells_opened: self.cells_opened,
                    failure: None,
                }
            }
            SearchStatus::Failed(reason) => {
                PathResult::failed(reason, self.cells_expanded, self.cells_opened)
            }
            SearchStatus::Searching => unreachable!("run() returned while still searching"),
        }
    }

    fn log_finish(&self, grid: &Grid) {
        let elapsed_us = self.started_at.elapsed().as_micros() as u64;
        match self.status {
            SearchStatus::Found => debug!(
                elapsed_us,
                expanded = self.cells_expanded,
                cost = grid.cell(self.target).g_cost,
                "path found"
            ),
            status => debug!(
                elapsed_us,
                expanded = self.cells_expanded,
                ?status,
                "no path"
            ),
        }
    }
}

/// Find a path between two world positions.
///
/// Both positions clamp to the grid. Fails without examining any cell when
/// either end lies in a blocked cell. A start and target in the same cell
/// succeed with no waypoints.
pub fn find_path(grid: &mut Grid, start_pos: WorldPoint, target_pos: WorldPoint) -> PathResult {
    PathSearch::new(grid, start_pos, target_pos).into_result(grid)
}

/// Follow parent links from `target` back to `start`; returns start first
fn retrace_path(grid: &Grid, start: CellId, target: CellId) -> Vec<CellId> {
    let mut path = Vec::new();
    let mut current = target;
    while current != start {
        path.push(current);
        match grid.cell(current).parent {
            Some(parent) => current = parent,
            None => break,
        }
    }
    path.push(start);
    path.reverse();
    path
}

/// Reduce a full cell path (start first) to the cells where movement
/// changes direction.
///
/// Keeps the first step, every corner and the target. Consecutive kept
/// cells are joined by straight 8-directional runs, so walking the segments
/// visits every cell of the unsimplified path. The start cell is dropped.
pub fn simplify_path(grid: &Grid, path: &[CellId]) -> Vec<CellId> {
    if path.len() < 2 {
        return Vec::new();
    }

    let mut waypoints = Vec::new();
    let mut previous_direction = None;
    for i in (1..path.len()).rev() {
        let (x, y) = grid.get_coords(path[i]);
        let (prev_x, prev_y) = grid.get_coords(path[i - 1]);
        let direction = (x - prev_x, y - prev_y);
        if previous_direction != Some(direction) {
            waypoints.push(path[i]);
        }
        previous_direction = Some(direction);
    }

    let first_step = path[1];
    if waypoints.last() != Some(&first_step) {
        waypoints.push(first_step);
    }
    waypoints.reverse();
    waypoints
}
