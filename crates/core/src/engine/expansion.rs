//! Orthogonal and diagonal growth passes.
//!
//! Outside entries grow their four orthogonal neighbours and then wait in the inside
//! queue; inside entries grow their four diagonal neighbours and are done. A queue's
//! head becomes due once the potential reaches the cost its children would carry, so
//! the orthogonal ring at +10 always resolves before the diagonal ring at +14.

use super::*;

impl<O: WalkabilityOracle> PerimeterEngine<O> {
    pub(super) fn expand_outside(&mut self) -> bool {
        if self.movement_potential < self.outside.next_cost() + ORTHOGONAL_STEP_COST {
            return false;
        }
        let Some(entry) = self.outside.remove_minimum() else {
            return false;
        };

        let mut grown = ExpansionEntry::new();
        for parent in entry.nodes() {
            let Some((cell, cost)) = self.expandable(*parent) else {
                continue;
            };
            for neighbor in cell.orthogonal_neighbors() {
                self.grow_into(neighbor, cost + ORTHOGONAL_STEP_COST, &mut grown);
            }
        }

        self.prune_sensors(entry.nodes());
        self.inside.insert(entry);
        self.push_frontier(grown);
        true
    }

    pub(super) fn expand_inside(&mut self) -> bool {
        if self.movement_potential < self.inside.next_cost() + DIAGONAL_STEP_COST {
            return false;
        }
        let Some(entry) = self.inside.remove_minimum() else {
            return false;
        };

        let mut grown = ExpansionEntry::new();
        for parent in entry.nodes() {
            let Some((cell, cost)) = self.expandable(*parent) else {
                continue;
            };
            for neighbor in cell.diagonal_neighbors() {
                self.grow_into(neighbor, cost + DIAGONAL_STEP_COST, &mut grown);
            }
        }

        self.push_frontier(grown);
        true
    }

    /// Cell and cost of a node that may still spread; searched nodes never do.
    fn expandable(&self, id: NodeId) -> Option<(Cell, f32)> {
        let node = self.pool.node(id)?;
        (!node.searched).then_some((node.cell, node.cost))
    }

    fn grow_into(&mut self, cell: Cell, cost: f32, grown: &mut ExpansionEntry) {
        if self.registry.contains(cell) {
            return;
        }
        let world = self.cell_world(cell);
        if !self.oracle.is_walkable(world) {
            return;
        }
        if let Some(id) = self.registry.activate(&mut self.pool, cell, world, cost) {
            grown.push(id, cost);
        }
    }

    fn push_frontier(&mut self, grown: ExpansionEntry) {
        if grown.is_empty() {
            return;
        }
        for id in grown.nodes() {
            self.attach_sensor(*id);
        }
        self.outside.insert(grown);
    }
}
