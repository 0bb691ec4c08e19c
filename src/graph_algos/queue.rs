use std::cmp::Ordering;

use crate::cost::CostComparator;


/// Slot in `CostQueue::positions` for an index that is not queued
const NOT_QUEUED: usize = usize::MAX;


/// Entry in the queue
/// - index identifies the node in the frontier arena
/// - cost is the tentative cost used for ordering
#[derive(Debug)]
struct Entry<C> {
    index: usize,
    cost: C,
}


/// Indexed binary min-heap ordered by a runtime comparator
///
/// `std::collections::BinaryHeap` needs `Ord` on its items, but the cost order
/// here only exists as a comparator object, so every operation takes it as an
/// argument. Each arena index is queued at most once and its cost can be
/// lowered in place. Equal costs pop in arena index order.
#[derive(Debug)]
pub(crate) struct CostQueue<C> {
    heap: Vec<Entry<C>>,
    positions: Vec<usize>, // arena index -> heap slot or NOT_QUEUED
}

impl<C> Default for CostQueue<C> {
    fn default() -> Self {
        Self {
            heap: Vec::new(),
            positions: Vec::new(),
        }
    }
}

impl<C> CostQueue<C> {

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.positions.get(index).is_some_and(|&slot| slot != NOT_QUEUED)
    }

    /// Smallest entry without removing it
    pub fn peek(&self) -> Option<(usize, &C)> {
        self.heap.first().map(|entry| (entry.index, &entry.cost))
    }

    /// Queue `index` at `cost`, or lower its cost if already queued
    /// A cost that is not lower than the queued one is ignored
    pub fn push_or_decrease(&mut self, index: usize, cost: C, comparator: &dyn CostComparator<C>) {
        if self.contains(index) {
            let slot = self.positions[index];
            if comparator.compare(&cost, &self.heap[slot].cost) == Ordering::Less {
                self.heap[slot].cost = cost;
                self.sift_up(slot, comparator);
            }
            return;
        }

        if self.positions.len() <= index {
            self.positions.resize(index + 1, NOT_QUEUED);
        }
        self.heap.push(Entry { index, cost });
        let slot = self.heap.len() - 1;
        self.positions[index] = slot;
        self.sift_up(slot, comparator);
    }

    /// Remove and return the smallest entry
    pub fn pop(&mut self, comparator: &dyn CostComparator<C>) -> Option<(usize, C)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let entry = self.heap.pop()?;
        self.positions[entry.index] = NOT_QUEUED;
        if !self.heap.is_empty() {
            self.sift_down(0, comparator);
        }
        Some((entry.index, entry.cost))
    }

    fn less(&self, a: usize, b: usize, comparator: &dyn CostComparator<C>) -> bool {
        let (a, b) = (&self.heap[a], &self.heap[b]);
        comparator
            .compare(&a.cost, &b.cost)
            .then_with(|| a.index.cmp(&b.index))
            == Ordering::Less
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions[self.heap[a].index] = a;
        self.positions[self.heap[b].index] = b;
    }

    fn sift_up(&mut self, mut slot: usize, comparator: &dyn CostComparator<C>) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.less(slot, parent, comparator) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize, comparator: &dyn CostComparator<C>) {
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < self.heap.len() && self.less(left, smallest, comparator) {
                smallest = left;
            }
            if right < self.heap.len() && self.less(right, smallest, comparator) {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::NaturalOrder;

    #[test]
    fn test_pops_in_cost_order() {
        let mut queue = CostQueue::default();
        for (index, cost) in [(0, 5), (1, 3), (2, 9), (3, 1), (4, 7)] {
            queue.push_or_decrease(index, cost, &NaturalOrder);
        }

        let mut order = Vec::new();
        while let Some((index, _)) = queue.pop(&NaturalOrder) {
            order.push(index);
        }
        assert_eq!(order, vec![3, 1, 0, 4, 2]);
    }

    #[test]
    fn test_decrease_key_moves_entry_forward() {
        let mut queue = CostQueue::default();
        queue.push_or_decrease(0, 10, &NaturalOrder);
        queue.push_or_decrease(1, 20, &NaturalOrder);
        queue.push_or_decrease(1, 5, &NaturalOrder);
        // Higher cost is ignored
        queue.push_or_decrease(0, 50, &NaturalOrder);

        assert_eq!(queue.heap.len(), 2);
        assert_eq!(queue.peek(), Some((1, &5)));
        assert_eq!(queue.pop(&NaturalOrder), Some((1, 5)));
        assert_eq!(queue.pop(&NaturalOrder), Some((0, 10)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_equal_costs_break_ties_by_index() {
        let mut queue = CostQueue::default();
        queue.push_or_decrease(4, 1.0, &NaturalOrder);
        queue.push_or_decrease(2, 1.0, &NaturalOrder);
        queue.push_or_decrease(7, 1.0, &NaturalOrder);

        assert_eq!(queue.pop(&NaturalOrder).map(|(i, _)| i), Some(2));
        assert_eq!(queue.pop(&NaturalOrder).map(|(i, _)| i), Some(4));
        assert!(!queue.contains(2));
        assert!(queue.contains(7));
    }
}
