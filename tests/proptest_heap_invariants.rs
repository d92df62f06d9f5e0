//! Property-based invariant tests for the indexed binary heap.
//!
//! 1. Draining returns items best first.
//! 2. Every stored item knows its own slot.
//! 3. `contains` tracks membership through inserts and removals.
//! 4. Priority changes in either direction followed by `update_item` keep
//!    the drain order correct.

use gridpath::heap::{Heap, HeapItem};
use proptest::prelude::*;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
struct Item {
    priority: u32,
    slot: usize,
}

impl HeapItem for Item {
    fn heap_index(&self) -> usize {
        self.slot
    }

    fn set_heap_index(&mut self, index: usize) {
        self.slot = index;
    }

    // Lower priority value is extracted first
    fn priority_cmp(&self, other: &Self) -> Ordering {
        other.priority.cmp(&self.priority)
    }
}

fn items(priorities: &[u32]) -> Vec<Item> {
    priorities
        .iter()
        .map(|&priority| Item { priority, slot: 0 })
        .collect()
}

fn drain(heap: &mut Heap, store: &mut [Item]) -> Vec<u32> {
    let mut out = Vec::new();
    while let Some(id) = heap.remove_first(store) {
        out.push(store[id].priority);
    }
    out
}

fn assert_slots(heap: &Heap, store: &[Item]) -> Result<(), TestCaseError> {
    for (slot, &id) in heap.as_slice().iter().enumerate() {
        prop_assert_eq!(store[id].heap_index(), slot, "item {} lost its slot", id);
        prop_assert!(heap.contains(store, id));
    }
    Ok(())
}

// ── 1. Drain order ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn drain_is_sorted(priorities in proptest::collection::vec(0u32..500, 0..120)) {
        let mut store = items(&priorities);
        let mut heap = Heap::new(store.len());
        for id in 0..store.len() {
            heap.insert(&mut store, id);
        }
        assert_slots(&heap, &store)?;

        let drained = drain(&mut heap, &mut store);
        let mut expected = priorities.clone();
        expected.sort_unstable();
        prop_assert_eq!(drained, expected);
        prop_assert!(heap.is_empty());
    }
}

// ── 2/3. Membership through interleaved operations ──────────────────────

proptest! {
    #[test]
    fn membership_follows_operations(
        priorities in proptest::collection::vec(0u32..100, 1..60),
        removals in 0usize..60,
    ) {
        let mut store = items(&priorities);
        let mut heap = Heap::new(store.len());
        let mut members = vec![false; store.len()];

        for id in 0..store.len() {
            prop_assert!(!heap.contains(&store, id));
            heap.insert(&mut store, id);
            members[id] = true;
        }
        for _ in 0..removals.min(store.len()) {
            if let Some(id) = heap.remove_first(&mut store) {
                members[id] = false;
            }
            assert_slots(&heap, &store)?;
        }
        for (id, &member) in members.iter().enumerate() {
            prop_assert_eq!(heap.contains(&store, id), member, "membership of {}", id);
        }
        prop_assert_eq!(heap.len(), members.iter().filter(|m| **m).count());
    }
}

// ── 4. Updates ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn updates_keep_order(
        priorities in proptest::collection::vec(0u32..1000, 1..80),
        changes in proptest::collection::vec((any::<prop::sample::Index>(), 0u32..1000), 0..80),
    ) {
        let mut store = items(&priorities);
        let mut heap = Heap::new(store.len());
        for id in 0..store.len() {
            heap.insert(&mut store, id);
        }

        for (index, priority) in changes {
            let id = index.index(store.len());
            store[id].priority = priority;
            heap.update_item(&mut store, id);
            assert_slots(&heap, &store)?;
        }

        let mut expected: Vec<u32> = store.iter().map(|item| item.priority).collect();
        expected.sort_unstable();
        prop_assert_eq!(drain(&mut heap, &mut store), expected);
    }
}
