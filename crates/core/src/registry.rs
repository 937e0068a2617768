//! Coordinate index over the nodes activated in the current session.

use std::collections::{HashMap, HashSet};
use std::collections::hash_map::Entry;

use crate::pool::{PerimeterPool, PotentialNode};
use crate::types::{Cell, IntegrityViolation, NodeId, WorldPos};

#[derive(Debug, Default)]
pub struct NodeRegistry {
    index: HashMap<Cell, NodeId>,
    /// Activation order. Drives deterministic iteration and random picks.
    order: Vec<NodeId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates `cell` with a fresh pooled node. Returns `None` if the cell is already present.
    pub fn activate(
        &mut self,
        pool: &mut PerimeterPool,
        cell: Cell,
        world: WorldPos,
        cost: f32,
    ) -> Option<NodeId> {
        let Entry::Vacant(slot) = self.index.entry(cell) else {
            return None;
        };
        let id = pool.acquire_node(cell, world, cost);
        slot.insert(id);
        self.order.push(id);
        Some(id)
    }

    pub fn lookup(&self, cell: Cell) -> Option<NodeId> {
        self.index.get(&cell).copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.index.contains_key(&cell)
    }

    pub fn neighbors_orthogonal(&self, cell: Cell) -> impl Iterator<Item = NodeId> + '_ {
        cell.orthogonal_neighbors().into_iter().filter_map(|n| self.lookup(n))
    }

    pub fn neighbors_diagonal(&self, cell: Cell) -> impl Iterator<Item = NodeId> + '_ {
        cell.diagonal_neighbors().into_iter().filter_map(|n| self.lookup(n))
    }

    pub fn neighbors_all(&self, cell: Cell) -> impl Iterator<Item = NodeId> + '_ {
        cell.all_neighbors().into_iter().filter_map(|n| self.lookup(n))
    }

    /// Returns `true` only on the transition from unsearched to searched.
    pub fn mark_searched(&self, pool: &mut PerimeterPool, id: NodeId) -> bool {
        match pool.node_mut(id) {
            Some(node) if !node.searched => {
                node.searched = true;
                true
            }
            _ => false,
        }
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Hands every node back to the pool and empties the index.
    pub fn release_all(&mut self, pool: &mut PerimeterPool) {
        for id in self.order.drain(..) {
            pool.release_node(id);
        }
        self.index.clear();
    }

    pub fn iter<'a>(
        &'a self,
        pool: &'a PerimeterPool,
    ) -> impl Iterator<Item = (NodeId, &'a PotentialNode)> + 'a {
        self.order.iter().filter_map(move |id| pool.node(*id).map(|node| (*id, node)))
    }

    pub fn check_integrity(&self, pool: &PerimeterPool) -> Result<(), IntegrityViolation> {
        for (cell, id) in &self.index {
            let Some(node) = pool.node(*id) else {
                return Err(IntegrityViolation::IndexPointsToMissingNode { cell: *cell });
            };
            if node.cell != *cell {
                return Err(IntegrityViolation::IndexCoordinateMismatch {
                    cell: *cell,
                    node_cell: node.cell,
                });
            }
        }
        let mut seen = HashSet::with_capacity(self.order.len());
        for id in &self.order {
            let Some(node) = pool.node(*id) else {
                continue;
            };
            if !seen.insert(node.cell) {
                return Err(IntegrityViolation::DuplicateCoordinate { cell: node.cell });
            }
            if self.index.get(&node.cell) != Some(id) {
                return Err(IntegrityViolation::NodeMissingFromIndex { cell: node.cell });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_rejects_duplicate_coordinates() {
        let mut pool = PerimeterPool::default();
        let mut registry = NodeRegistry::new();

        let first = registry.activate(&mut pool, Cell::ORIGIN, WorldPos::default(), 0.0);
        let second = registry.activate(&mut pool, Cell::ORIGIN, WorldPos::new(5.0, 5.0), 10.0);

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(pool.nodes().len(), 1);
        assert_eq!(pool.node(first.unwrap()).map(|n| n.cost), Some(0.0));
    }

    #[test]
    fn neighbor_lookup_only_returns_present_cells() {
        let mut pool = PerimeterPool::default();
        let mut registry = NodeRegistry::new();
        let center = Cell { x: 2, y: 2 };
        registry.activate(&mut pool, center, WorldPos::default(), 0.0);
        let east = registry.activate(&mut pool, center.offset(1, 0), WorldPos::default(), 10.0);
        let corner = registry.activate(&mut pool, center.offset(-1, 1), WorldPos::default(), 14.0);

        let orthogonal: Vec<_> = registry.neighbors_orthogonal(center).collect();
        let diagonal: Vec<_> = registry.neighbors_diagonal(center).collect();

        assert_eq!(orthogonal, vec![east.unwrap()]);
        assert_eq!(diagonal, vec![corner.unwrap()]);
        assert_eq!(registry.neighbors_all(center).count(), 2);
    }

    #[test]
    fn mark_searched_reports_only_the_first_transition() {
        let mut pool = PerimeterPool::default();
        let mut registry = NodeRegistry::new();
        let id = registry.activate(&mut pool, Cell::ORIGIN, WorldPos::default(), 0.0).unwrap();

        assert!(registry.mark_searched(&mut pool, id));
        assert!(!registry.mark_searched(&mut pool, id));
        assert!(pool.node(id).unwrap().searched);
    }

    #[test]
    fn release_all_returns_nodes_and_keeps_integrity() {
        let mut pool = PerimeterPool::default();
        let mut registry = NodeRegistry::new();
        for x in 0..4 {
            registry.activate(&mut pool, Cell { x, y: 0 }, WorldPos::default(), 0.0);
        }
        assert_eq!(registry.check_integrity(&pool), Ok(()));

        registry.release_all(&mut pool);

        assert!(registry.is_empty());
        assert!(!registry.contains(Cell::ORIGIN));
        assert_eq!(pool.nodes().stats().live(), 0);
        assert_eq!(registry.check_integrity(&pool), Ok(()));
    }

    #[test]
    fn integrity_check_detects_a_node_whose_cell_was_rewritten() {
        let mut pool = PerimeterPool::default();
        let mut registry = NodeRegistry::new();
        let id = registry.activate(&mut pool, Cell::ORIGIN, WorldPos::default(), 0.0).unwrap();
        pool.node_mut(id).unwrap().cell = Cell { x: 9, y: 9 };

        assert_eq!(
            registry.check_integrity(&pool),
            Err(IntegrityViolation::IndexCoordinateMismatch {
                cell: Cell::ORIGIN,
                node_cell: Cell { x: 9, y: 9 },
            })
        );
    }
}
