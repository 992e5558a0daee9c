//! Best-first frontier over arena handles.
//!
//! Entries carry their ordering key so the heap never has to look nodes up in
//! the arena while sifting.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::node::{ActionNode, FrontierKey, NodeId};

/// Best-first frontier manager.
///
/// `BinaryHeap` is a max-heap, so keys are wrapped in `Reverse` to pop the
/// lowest `f_cost` first.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Reverse<FrontierKey>>,
    high_water: usize,
}

impl Frontier {
    /// Create a new empty frontier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            high_water: 0,
        }
    }

    /// Queue a node for expansion.
    pub fn push(&mut self, node: &ActionNode) {
        self.heap.push(Reverse(FrontierKey::from(node)));
        self.high_water = self.high_water.max(self.heap.len());
    }

    /// Pop the best (lowest `f_cost`) node.
    #[must_use]
    pub fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|Reverse(key)| key.id)
    }

    /// The node `pop` would return, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<NodeId> {
        self.heap.peek().map(|Reverse(key)| key.id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Largest size the frontier reached.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}
