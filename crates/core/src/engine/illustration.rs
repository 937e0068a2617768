//! Debug markers for the potential area.
//!
//! Nodes still sitting in a frontier queue carry an active marker that is rebuilt after
//! every expansion. Everything else unsearched gets an inactive marker once and is then
//! left alone. Searched nodes carry nothing.

use std::collections::HashSet;

use super::*;

impl<O: WalkabilityOracle> PerimeterEngine<O> {
    pub(super) fn refresh_illustration(&mut self) {
        if !self.config.show_potential_area {
            return;
        }

        let active: Vec<NodeId> = self
            .markers
            .iter()
            .filter(|(_, marker)| {
                self.pool.marker(**marker).is_some_and(|m| m.kind == MarkerKind::Active)
            })
            .map(|(node, _)| node)
            .collect();
        for node in active {
            if let Some(marker) = self.markers.remove(node) {
                self.pool.release_marker(marker);
            }
        }

        let queued: HashSet<NodeId> =
            self.outside.node_ids().chain(self.inside.node_ids()).collect();
        let size = self.config.node_diameter();
        for id in self.registry.ids() {
            // Whatever still holds a marker here is inactive and stays buried.
            if self.markers.contains_key(*id) {
                continue;
            }
            let Some(node) = self.pool.node(*id) else {
                continue;
            };
            if node.searched {
                continue;
            }
            let kind = if queued.contains(id) { MarkerKind::Active } else { MarkerKind::Inactive };
            let position = node.world;
            let marker = self.pool.acquire_marker(kind, position, size);
            self.markers.insert(*id, marker);
        }
    }

    pub fn markers(&self) -> impl Iterator<Item = (NodeId, &Marker)> + '_ {
        self.markers
            .iter()
            .filter_map(|(node, id)| self.pool.marker(*id).map(|marker| (node, marker)))
    }
}
