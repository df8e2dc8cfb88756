//! Array-backed binary min-heap keyed by weight.
//!
//! # Ordering
//!
//! Entries are ordered by `(weight, arrival)`, where `arrival` is a counter
//! stamped on each item as it enters the queue. Equal weights therefore pop
//! in arrival order, and the same sequence of pushes always produces the same
//! sequence of pops.
//!
//! # Layout
//!
//! Index 0 is the root; the children of `i` are `2i + 1` and `2i + 2`.
//! Every entry's key is <= the keys of both its children.

use crate::error::{QueueError, Result};

/// Anything that can be ordered by a frequency weight.
pub trait Weighted {
    fn weight(&self) -> u64;
}

impl Weighted for u64 {
    fn weight(&self) -> u64 {
        *self
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    weight: u64,
    arrival: u64,
    item: T,
}

impl<T> Entry<T> {
    fn key(&self) -> (u64, u64) {
        (self.weight, self.arrival)
    }
}

/// Min-ordered priority queue with deterministic tie-breaking.
#[derive(Debug, Clone)]
pub struct MinQueue<T> {
    entries: Vec<Entry<T>>,
    next_arrival: u64,
}

impl<T: Weighted> MinQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_arrival: 0,
        }
    }

    /// Build a queue from `items` in O(n) with a bottom-up sift.
    ///
    /// Items receive arrival stamps in iteration order.
    pub fn from_items<I: IntoIterator<Item = T>>(items: I) -> Self {
        let mut queue = Self::new();
        for item in items {
            let entry = queue.stamp(item);
            queue.entries.push(entry);
        }
        for i in (0..queue.entries.len() / 2).rev() {
            queue.sift_down(i);
        }
        queue
    }

    /// Insert an item. O(log n).
    pub fn push(&mut self, item: T) {
        let entry = self.stamp(item);
        self.entries.push(entry);
        self.sift_up(self.entries.len() - 1);
    }

    /// Remove and return the minimum item. O(log n).
    ///
    /// # Errors
    /// `QueueError::EmptyQueue` if the queue holds nothing.
    pub fn pop(&mut self) -> Result<T> {
        if self.entries.is_empty() {
            return Err(QueueError::EmptyQueue.into());
        }
        let entry = self.entries.swap_remove(0);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Ok(entry.item)
    }

    /// The item `pop` would return next.
    pub fn peek(&self) -> Option<&T> {
        self.entries.first().map(|entry| &entry.item)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the heap property over every parent/child pair.
    pub fn is_valid_heap(&self) -> bool {
        (1..self.entries.len()).all(|i| self.entries[(i - 1) / 2].key() <= self.entries[i].key())
    }

    fn stamp(&mut self, item: T) -> Entry<T> {
        let arrival = self.next_arrival;
        self.next_arrival += 1;
        Entry {
            weight: item.weight(),
            arrival,
            item,
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[i].key() >= self.entries[parent].key() {
                break;
            }
            self.entries.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.entries.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;

            if left < n && self.entries[left].key() < self.entries[smallest].key() {
                smallest = left;
            }
            if right < n && self.entries[right].key() < self.entries[smallest].key() {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.entries.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<T: Weighted> Default for MinQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[derive(Debug, PartialEq)]
    struct Tagged(u64, char);

    impl Weighted for Tagged {
        fn weight(&self) -> u64 {
            self.0
        }
    }

    fn drain<T: Weighted>(queue: &mut MinQueue<T>) -> Vec<T> {
        let mut out = Vec::new();
        while !queue.is_empty() {
            out.push(queue.pop().unwrap());
        }
        out
    }

    #[test]
    fn test_bulk_build_pops_in_weight_order() {
        let mut queue = MinQueue::from_items([5u64, 2, 2, 1, 1]);
        assert!(queue.is_valid_heap());
        assert_eq!(queue.len(), 5);
        assert_eq!(drain(&mut queue), vec![1, 1, 2, 2, 5]);
    }

    #[test]
    fn test_push_pops_in_weight_order() {
        let mut queue = MinQueue::new();
        for w in [5u64, 2, 2, 1, 1] {
            queue.push(w);
            assert!(queue.is_valid_heap());
        }
        assert_eq!(queue.peek(), Some(&1));
        assert_eq!(drain(&mut queue), vec![1, 1, 2, 2, 5]);
    }

    #[test]
    fn test_ties_pop_in_arrival_order() {
        let mut queue = MinQueue::from_items([Tagged(3, 'a'), Tagged(1, 'b'), Tagged(3, 'c')]);
        queue.push(Tagged(1, 'd'));
        queue.push(Tagged(3, 'e'));

        let order: String = drain(&mut queue).into_iter().map(|t| t.1).collect();
        assert_eq!(order, "bdace");
    }

    #[test]
    fn test_pop_empty() {
        let mut queue: MinQueue<u64> = MinQueue::new();
        assert!(matches!(
            queue.pop(),
            Err(Error::Queue(QueueError::EmptyQueue))
        ));

        queue.push(7);
        assert_eq!(queue.pop().unwrap(), 7);
        assert!(queue.pop().is_err());
    }

    #[test]
    fn test_interleaved_push_pop() {
        let mut queue = MinQueue::from_items([9u64, 4, 7]);
        assert_eq!(queue.pop().unwrap(), 4);
        queue.push(1);
        queue.push(8);
        assert_eq!(queue.pop().unwrap(), 1);
        assert_eq!(queue.pop().unwrap(), 7);
        queue.push(2);
        assert!(queue.is_valid_heap());
        assert_eq!(drain(&mut queue), vec![2, 8, 9]);
    }
}
