//! Cost-ordered frontier of node batches.
//! Entries arrive nearly sorted, so insertion bubbles the new entry toward the front
//! instead of maintaining a heap. Equal costs keep arrival order.

use std::collections::VecDeque;

use crate::types::{NO_PENDING_COST, NodeId};

/// Nodes that became reachable in the same expansion step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpansionEntry {
    cost: f32,
    nodes: Vec<NodeId>,
}

impl ExpansionEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(node: NodeId, cost: f32) -> Self {
        Self { cost, nodes: vec![node] }
    }

    /// The first member fixes the entry cost.
    pub fn push(&mut self, node: NodeId, cost: f32) {
        if self.nodes.is_empty() {
            self.cost = cost;
        }
        self.nodes.push(node);
    }

    pub fn cost(&self) -> f32 {
        self.cost
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrontierQueue {
    entries: VecDeque<ExpansionEntry>,
}

impl FrontierQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: ExpansionEntry) {
        self.entries.push_back(entry);
        let mut idx = self.entries.len() - 1;
        while idx > 0 && self.entries[idx].cost < self.entries[idx - 1].cost {
            self.entries.swap(idx, idx - 1);
            idx -= 1;
        }
    }

    /// Pops the cheapest entry; `None` when empty.
    pub fn remove_minimum(&mut self) -> Option<ExpansionEntry> {
        self.entries.pop_front()
    }

    /// Cost of the cheapest entry, or `NO_PENDING_COST` when empty.
    pub fn next_cost(&self) -> f32 {
        self.entries.front().map_or(NO_PENDING_COST, ExpansionEntry::cost)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> impl Iterator<Item = &ExpansionEntry> + '_ {
        self.entries.iter()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().flat_map(|entry| entry.nodes.iter().copied())
    }

    pub fn is_sorted(&self) -> bool {
        self.entries.iter().zip(self.entries.iter().skip(1)).all(|(a, b)| a.cost <= b.cost)
    }
}
