use super::*;

impl<O: WalkabilityOracle> PerimeterEngine<O> {
    /// Handles an agent entering `sensor`. Returns `true` if a node became searched.
    ///
    /// Stale handles and already-searched nodes are ignored, so a sensor that fires twice
    /// in the same frame is harmless.
    pub fn investigate(&mut self, sensor: SensorId) -> bool {
        let Some(zone) = self.pool.sensor(sensor) else {
            log::debug!("ignored investigation through released sensor {sensor:?}");
            return false;
        };
        let node_id = zone.node;
        if self.sensors.get(node_id) != Some(&sensor) {
            log::debug!("ignored investigation through unbound sensor {sensor:?}");
            return false;
        }
        if !self.registry.mark_searched(&mut self.pool, node_id) {
            return false;
        }
        let Some(cell) = self.pool.node(node_id).map(|node| node.cell) else {
            return false;
        };

        let neighbors: Vec<NodeId> = self.registry.neighbors_all(cell).collect();
        for neighbor in neighbors {
            self.attach_sensor(neighbor);
        }
        self.detach_sensor(node_id);
        if let Some(marker) = self.markers.remove(node_id) {
            self.pool.release_marker(marker);
        }

        self.events.push(PerimeterEvent::NodeInvestigated { cell });
        log::debug!("cell {cell:?} investigated");
        true
    }

    /// Investigates the node at `cell` through its sensor, if it has one.
    pub fn investigate_cell(&mut self, cell: Cell) -> bool {
        match self.sensor_at(cell) {
            Some(sensor) => self.investigate(sensor),
            None => false,
        }
    }

    /// Drops sensors that no longer border searched ground.
    pub(super) fn prune_sensors(&mut self, nodes: &[NodeId]) {
        for id in nodes {
            if self.sensors.contains_key(*id) && !self.sensor_still_needed(*id) {
                self.detach_sensor(*id);
            }
        }
    }

    /// A sensor earns its keep while it touches searched ground and some walkable
    /// neighbour is still open. Walls count as enclosing.
    pub(super) fn sensor_still_needed(&self, id: NodeId) -> bool {
        let Some(node) = self.pool.node(id) else {
            return false;
        };
        let mut touches_searched = false;
        let mut enclosed = true;
        for cell in node.cell.all_neighbors() {
            match self.registry.lookup(cell).and_then(|n| self.pool.node(n)) {
                Some(neighbor) if neighbor.searched => touches_searched = true,
                Some(_) => enclosed = false,
                None if self.oracle.is_walkable(self.cell_world(cell)) => enclosed = false,
                None => {}
            }
        }
        touches_searched && !enclosed
    }
}
