use std::cmp::Ordering;

/// An element that can live in a [`Heap`].
///
/// Items are stored outside the heap (usually in a grid's cell vector); the
/// heap only keeps their ids and asks each item for its current slot.
pub trait HeapItem {
    /// Slot this item occupies in the heap that currently holds it
    fn heap_index(&self) -> usize;

    fn set_heap_index(&mut self, index: usize);

    /// `Greater` means `self` should be extracted before `other`
    fn priority_cmp(&self, other: &Self) -> Ordering;
}

/// Fixed-capacity binary heap over item ids with in-place priority updates.
///
/// The heap is a max-heap over [`HeapItem::priority_cmp`]: the root is the
/// item that compares greatest. Every operation takes the backing item
/// slice so slot handles can be written back into the items themselves.
#[derive(Debug, Clone)]
pub struct Heap {
    items: Vec<usize>,
    capacity: usize,
}

impl Heap {
    /// Create an empty heap that can hold at most `capacity` ids
    pub fn new(capacity: usize) -> Self {
        Heap {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Add `id` and sift it up to its place.
    ///
    /// Panics if the heap is already full: the capacity must be an upper
    /// bound on membership (the grid's cell count for a path search).
    pub fn insert<T: HeapItem>(&mut self, store: &mut [T], id: usize) {
        assert!(
            self.items.len() < self.capacity,
            "heap capacity exceeded ({} items)",
            self.capacity
        );
        let slot = self.items.len();
        store[id].set_heap_index(slot);
        self.items.push(id);
        self.sort_up(store, id);
    }

    /// Remove and return the best item, or `None` when empty
    pub fn remove_first<T: HeapItem>(&mut self, store: &mut [T]) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        let first = self.items.swap_remove(0);
        if let Some(&root) = self.items.first() {
            store[root].set_heap_index(0);
            self.sort_down(store, root);
        }
        Some(first)
    }

    /// O(1) membership test through the item's recorded slot
    pub fn contains<T: HeapItem>(&self, store: &[T], id: usize) -> bool {
        let slot = store[id].heap_index();
        slot < self.items.len() && self.items[slot] == id
    }

    /// Restore ordering after the item's priority changed.
    ///
    /// Path searches only ever improve a member's priority, which needs the
    /// upward pass alone. If the item did not move up it is also sifted
    /// down, so a call after a degradation still leaves a valid heap.
    pub fn update_item<T: HeapItem>(&mut self, store: &mut [T], id: usize) {
        let before = store[id].heap_index();
        self.sort_up(store, id);
        if store[id].heap_index() == before {
            self.sort_down(store, id);
        }
    }

    fn sort_up<T: HeapItem>(&mut self, store: &mut [T], id: usize) {
        loop {
            let slot = store[id].heap_index();
            if slot == 0 {
                break;
            }
            let parent = self.items[(slot - 1) / 2];
            if store[id].priority_cmp(&store[parent]) == Ordering::Greater {
                self.swap(store, id, parent);
            } else {
                break;
            }
        }
    }

    fn sort_down<T: HeapItem>(&mut self, store: &mut [T], id: usize) {
        loop {
            let slot = store[id].heap_index();
            let left = slot * 2 + 1;
            let right = slot * 2 + 2;
            if left >= self.items.len() {
                break;
            }

            let mut swap_id = self.items[left];
            if right < self.items.len() {
                let right_id = self.items[right];
                if store[right_id].priority_cmp(&store[swap_id]) == Ordering::Greater {
                    swap_id = right_id;
                }
            }

            if store[swap_id].priority_cmp(&store[id]) == Ordering::Greater {
                self.swap(store, id, swap_id);
            } else {
                break;
            }
        }
    }

    fn swap<T: HeapItem>(&mut self, store: &mut [T], a: usize, b: usize) {
        let slot_a = store[a].heap_index();
        let slot_b = store[b].heap_index();
        self.items.swap(slot_a, slot_b);
        store[a].set_heap_index(slot_b);
        store[b].set_heap_index(slot_a);
    }

    /// Ids in slot order; exposed for invariant checks
    pub fn as_slice(&self) -> &[usize] {
        &self.items
    }
}
