use rand_chacha::rand_core::Rng;

use super::*;

impl<O: WalkabilityOracle> PerimeterEngine<O> {
    /// Session cell containing `world`, whether or not the area reaches it yet.
    pub fn cell_for_world(&self, world: WorldPos) -> Cell {
        let snapped = self.oracle.snap_to_cell_center(world);
        let diameter = self.config.node_diameter();
        Cell {
            x: ((snapped.x - self.origin.x) / diameter).round() as i32,
            y: ((snapped.y - self.origin.y) / diameter).round() as i32,
        }
    }

    pub fn node_at(&self, cell: Cell) -> Option<NodeId> {
        self.registry.lookup(cell)
    }

    pub fn sensor_at(&self, cell: Cell) -> Option<SensorId> {
        self.registry.lookup(cell).and_then(|node| self.sensor_for(node))
    }

    /// Whether the cell containing `world` is part of the area and has been searched.
    pub fn is_cleared(&self, world: WorldPos) -> bool {
        if self.registry.is_empty() || !self.oracle.is_walkable(world) {
            return false;
        }
        self.node_at(self.cell_for_world(world))
            .and_then(|id| self.pool.node(id))
            .is_some_and(|node| node.searched)
    }

    /// Uniform pick among unsearched nodes, drawn from the session's seeded stream.
    pub fn random_unsearched_location(&mut self) -> Result<WorldPos, PerimeterError> {
        let candidates: Vec<WorldPos> = self
            .registry
            .iter(&self.pool)
            .filter(|(_, node)| !node.searched)
            .map(|(_, node)| node.world)
            .collect();
        if candidates.is_empty() {
            return Err(PerimeterError::EmptyArea);
        }
        let pick = (self.rng.next_u64() % candidates.len() as u64) as usize;
        Ok(candidates[pick])
    }
}
