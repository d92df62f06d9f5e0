use crate::heap::HeapItem;
use crate::point::WorldPoint;
use std::cmp::Ordering;

/// Index of a cell in its grid's dense storage
pub type CellId = usize;

/// One grid entry: fixed terrain data plus the scratch state of the most
/// recent search that touched it.
#[derive(Debug, Clone)]
pub struct Cell {
    pub walkable: bool,
    pub world_position: WorldPoint,
    pub grid_x: i32,
    pub grid_y: i32,
    /// Added to the cost of every step that enters this cell
    pub movement_penalty: u32,

    /// Cost from the search start
    pub g_cost: u32,
    /// Estimated cost to the search target
    pub h_cost: u32,
    pub parent: Option<CellId>,
    heap_index: usize,
}

impl Cell {
    pub fn new(
        walkable: bool,
        world_position: WorldPoint,
        grid_x: i32,
        grid_y: i32,
        movement_penalty: u32,
    ) -> Self {
        Cell {
            walkable,
            world_position,
            grid_x,
            grid_y,
            movement_penalty,
            g_cost: 0,
            h_cost: 0,
            parent: None,
            heap_index: 0,
        }
    }

    pub fn f_cost(&self) -> u32 {
        self.g_cost.saturating_add(self.h_cost)
    }
}

impl HeapItem for Cell {
    fn heap_index(&self) -> usize {
        self.heap_index
    }

    fn set_heap_index(&mut self, index: usize) {
        self.heap_index = index;
    }

    // Lower f wins; on equal f the cell closer to the target wins
    fn priority_cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost()
            .cmp(&self.f_cost())
            .then_with(|| other.h_cost.cmp(&self.h_cost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(g: u32, h: u32) -> Cell {
        let mut cell = Cell::new(true, WorldPoint::ZERO, 0, 0, 0);
        cell.g_cost = g;
        cell.h_cost = h;
        cell
    }

    #[test]
    fn test_lower_f_cost_is_better() {
        assert_eq!(scored(10, 10).priority_cmp(&scored(10, 14)), Ordering::Greater);
    }

    #[test]
    fn test_equal_f_cost_prefers_lower_heuristic() {
        assert_eq!(scored(14, 10).priority_cmp(&scored(10, 14)), Ordering::Greater);
        assert_eq!(scored(10, 14).priority_cmp(&scored(14, 10)), Ordering::Less);
        assert_eq!(scored(10, 14).priority_cmp(&scored(10, 14)), Ordering::Equal);
    }

    #[test]
    fn test_f_cost_saturates() {
        assert_eq!(scored(u32::MAX - 5, 14).f_cost(), u32::MAX);
        assert_eq!(scored(u32::MAX, 0).priority_cmp(&scored(u32::MAX - 1, 20)), Ordering::Greater);
    }
}
