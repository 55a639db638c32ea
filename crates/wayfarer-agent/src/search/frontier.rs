//! Frontier containers for graph search
//!
//! A frontier holds the discovered-but-unexpanded nodes. The traversal
//! discipline of a search is entirely decided by which frontier it uses.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

/// Polymorphic frontier capability
pub trait Frontier<T> {
    /// Add an item. Containers without an ordering ignore `priority`.
    fn push(&mut self, item: T, priority: f64);

    /// Remove the next item to expand
    fn pop(&mut self) -> Option<T>;

    /// Number of pending items
    fn len(&self) -> usize;

    /// Whether nothing is pending
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Last-in-first-out frontier (depth-first)
#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    /// Create an empty stack
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Frontier<T> for Stack<T> {
    fn push(&mut self, item: T, _priority: f64) {
        self.items.push(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// First-in-first-out frontier (breadth-first)
#[derive(Debug, Clone)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Frontier<T> for Queue<T> {
    fn push(&mut self, item: T, _priority: f64) {
        self.items.push_back(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Heap entry ordered so that `BinaryHeap` (a max-heap) pops the lowest
/// priority first, and the earliest insertion among equal priorities.
#[derive(Debug)]
struct Entry<T> {
    priority: f64,
    sequence: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Min-priority frontier (uniform-cost and A*)
#[derive(Debug)]
pub struct PriorityQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

impl<T> PriorityQueue<T> {
    /// Create an empty priority queue
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Frontier<T> for PriorityQueue<T> {
    fn push(&mut self, item: T, priority: f64) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Entry {
            priority,
            sequence,
            item,
        });
    }

    fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|entry| entry.item)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<F: Frontier<char>>(mut frontier: F, items: &[(char, f64)]) -> String {
        for &(item, priority) in items {
            frontier.push(item, priority);
        }
        let mut out = String::new();
        while let Some(item) = frontier.pop() {
            out.push(item);
        }
        assert!(frontier.is_empty());
        out
    }

    const ITEMS: [(char, f64); 4] = [('a', 3.0), ('b', 1.0), ('c', 2.0), ('d', 1.0)];

    #[test]
    fn test_stack_is_lifo() {
        assert_eq!(drain(Stack::new(), &ITEMS), "dcba");
    }

    #[test]
    fn test_queue_is_fifo() {
        assert_eq!(drain(Queue::new(), &ITEMS), "abcd");
    }

    #[test]
    fn test_priority_queue_pops_lowest_then_oldest() {
        assert_eq!(drain(PriorityQueue::new(), &ITEMS), "bdca");
    }

    #[test]
    fn test_priority_queue_len_tracks_pushes() {
        let mut queue = PriorityQueue::new();
        assert!(queue.is_empty());
        queue.push("x", 4.0);
        queue.push("y", 0.5);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some("y"));
        assert_eq!(queue.len(), 1);
    }
}
