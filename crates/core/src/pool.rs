//! Reusable storage for nodes, visual markers, and sensor zones.
//!
//! Every pool is a slotmap arena: released slots go on the arena's free list and are
//! overwritten by the next acquire, so handles are plain generational indices and a
//! stale handle simply resolves to nothing. Capacities are tuning hints; running past
//! one grows the arena and logs the shortfall.

use slotmap::{Key, SlotMap};

use crate::config::PoolCapacities;
use crate::types::{Cell, MarkerId, MarkerKind, NodeId, SensorId, WorldPos};

/// Mutable record for a cell that has entered the potential area.
#[derive(Clone, Debug, PartialEq)]
pub struct PotentialNode {
    pub cell: Cell,
    pub world: WorldPos,
    /// Movement potential at which the target could first have reached this cell.
    pub cost: f32,
    pub searched: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: WorldPos,
    pub size: f32,
}

/// Trigger volume around a frontier node. Entering it reports the node as investigated.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorZone {
    pub node: NodeId,
    pub cell: Cell,
    pub position: WorldPos,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub acquired: u64,
    pub released: u64,
    pub shortfalls: u64,
}

impl PoolStats {
    pub fn live(&self) -> u64 {
        self.acquired - self.released
    }
}

pub struct Pool<K: Key, V> {
    label: &'static str,
    slots: SlotMap<K, V>,
    capacity: usize,
    stats: PoolStats,
}

impl<K: Key, V> Pool<K, V> {
    pub fn with_capacity(label: &'static str, capacity: usize) -> Self {
        Self {
            label,
            slots: SlotMap::with_capacity_and_key(capacity),
            capacity,
            stats: PoolStats::default(),
        }
    }

    pub fn acquire(&mut self, value: V) -> K {
        if self.slots.len() >= self.capacity {
            let grown = (self.capacity * 2).max(1);
            log::warn!(
                "{} pool exhausted at {} slots, growing to {}; raise the configured capacity",
                self.label,
                self.capacity,
                grown
            );
            self.stats.shortfalls += 1;
            self.capacity = grown;
            self.slots.reserve(grown - self.slots.len());
        }
        self.stats.acquired += 1;
        self.slots.insert(value)
    }

    /// Returns `None` for a handle that was already released.
    pub fn release(&mut self, key: K) -> Option<V> {
        let value = self.slots.remove(key)?;
        self.stats.released += 1;
        Some(value)
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.slots.get(key)
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.slots.get_mut(key)
    }

    pub fn contains(&self, key: K) -> bool {
        self.slots.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

/// The three pools the engine draws from. Built by the host and handed to the engine.
pub struct PerimeterPool {
    nodes: Pool<NodeId, PotentialNode>,
    markers: Pool<MarkerId, Marker>,
    sensors: Pool<SensorId, SensorZone>,
}

impl PerimeterPool {
    pub fn new(capacities: &PoolCapacities) -> Self {
        Self {
            nodes: Pool::with_capacity("node", capacities.nodes),
            markers: Pool::with_capacity("marker", capacities.markers),
            sensors: Pool::with_capacity("sensor", capacities.sensors),
        }
    }

    pub fn acquire_node(&mut self, cell: Cell, world: WorldPos, cost: f32) -> NodeId {
        self.nodes.acquire(PotentialNode { cell, world, cost, searched: false })
    }

    pub fn release_node(&mut self, id: NodeId) -> Option<PotentialNode> {
        self.nodes.release(id)
    }

    pub fn acquire_marker(&mut self, kind: MarkerKind, position: WorldPos, size: f32) -> MarkerId {
        self.markers.acquire(Marker { kind, position, size })
    }

    pub fn release_marker(&mut self, id: MarkerId) -> Option<Marker> {
        self.markers.release(id)
    }

    pub fn acquire_sensor(
        &mut self,
        node: NodeId,
        cell: Cell,
        position: WorldPos,
        radius: f32,
    ) -> SensorId {
        self.sensors.acquire(SensorZone { node, cell, position, radius })
    }

    pub fn release_sensor(&mut self, id: SensorId) -> Option<SensorZone> {
        self.sensors.release(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&PotentialNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut PotentialNode> {
        self.nodes.get_mut(id)
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn sensor(&self, id: SensorId) -> Option<&SensorZone> {
        self.sensors.get(id)
    }

    pub fn nodes(&self) -> &Pool<NodeId, PotentialNode> {
        &self.nodes
    }

    pub fn markers(&self) -> &Pool<MarkerId, Marker> {
        &self.markers
    }

    pub fn sensors(&self) -> &Pool<SensorId, SensorZone> {
        &self.sensors
    }
}

impl Default for PerimeterPool {
    fn default() -> Self {
        Self::new(&PoolCapacities::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhaustion_grows_instead_of_failing() {
        let mut pool: Pool<NodeId, u32> = Pool::with_capacity("test", 2);
        let keys: Vec<_> = (0..5).map(|value| pool.acquire(value)).collect();

        assert_eq!(pool.len(), 5);
        assert!(pool.capacity() >= 5);
        assert_eq!(pool.stats().shortfalls, 2);
        assert!(keys.iter().all(|key| pool.contains(*key)));
    }

    #[test]
    fn zero_capacity_pool_still_serves_requests() {
        let mut pool: Pool<SensorId, ()> = Pool::with_capacity("empty", 0);
        let key = pool.acquire(());
        assert!(pool.contains(key));
        assert_eq!(pool.stats().shortfalls, 1);
    }

    #[test]
    fn double_release_is_a_no_op() {
        let mut pool = PerimeterPool::default();
        let id = pool.acquire_node(Cell::ORIGIN, WorldPos::default(), 0.0);

        assert!(pool.release_node(id).is_some());
        assert!(pool.release_node(id).is_none());
        assert_eq!(pool.nodes().stats().released, 1);
        assert_eq!(pool.nodes().stats().live(), 0);
    }

    #[test]
    fn reused_slot_comes_back_reset_and_old_handle_stays_dead() {
        let mut pool = PerimeterPool::default();
        let first = pool.acquire_node(Cell { x: 4, y: 4 }, WorldPos::new(9.0, 9.0), 40.0);
        pool.node_mut(first).expect("live node").searched = true;
        pool.release_node(first);

        let second = pool.acquire_node(Cell::ORIGIN, WorldPos::default(), 0.0);
        let node = pool.node(second).expect("live node");
        assert!(!node.searched);
        assert_eq!(node.cost, 0.0);
        assert_eq!(node.cell, Cell::ORIGIN);
        assert!(pool.node(first).is_none());
    }
}
