//! Potential-area engine: session lifecycle, state accessors, and invariant checks.
//! Tick advancement, expansion passes, investigation handling, markers, and queries
//! live in focused submodules.

use std::hash::Hasher;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use slotmap::SecondaryMap;
use xxhash_rust::xxh3::Xxh3;

use crate::config::PerimeterConfig;
use crate::grid::WalkabilityOracle;
use crate::pool::{Marker, PerimeterPool, PotentialNode, SensorZone};
use crate::queue::{ExpansionEntry, FrontierQueue};
use crate::registry::NodeRegistry;
use crate::types::*;

mod advance;
mod expansion;
mod illustration;
mod investigation;
mod queries;


pub struct PerimeterEngine<O: WalkabilityOracle> {
    config: PerimeterConfig,
    oracle: O,
    pool: PerimeterPool,
    rng: ChaCha8Rng,
    registry: NodeRegistry,
    outside: FrontierQueue,
    inside: FrontierQueue,
    // At most one sensor and one marker per node.
    sensors: SecondaryMap<NodeId, SensorId>,
    markers: SecondaryMap<NodeId, MarkerId>,
    origin: WorldPos,
    state: EngineState,
    movement_potential: f32,
    outside_timer: f32,
    inside_timer: f32,
    events: Vec<PerimeterEvent>,
}

impl<O: WalkabilityOracle> PerimeterEngine<O> {
    pub fn new(
        config: PerimeterConfig,
        oracle: O,
        pool: PerimeterPool,
    ) -> Result<Self, PerimeterError> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            oracle,
            pool,
            rng,
            registry: NodeRegistry::new(),
            outside: FrontierQueue::new(),
            inside: FrontierQueue::new(),
            sensors: SecondaryMap::new(),
            markers: SecondaryMap::new(),
            origin: WorldPos::default(),
            state: EngineState::Idle,
            movement_potential: 0.0,
            outside_timer: NO_PENDING_COST,
            inside_timer: NO_PENDING_COST,
            events: Vec::new(),
        })
    }

    /// Starts a new session at the cell containing `origin`, discarding any previous one.
    /// An unwalkable origin is rejected and leaves the current session untouched.
    pub fn start(&mut self, origin: WorldPos) -> Result<(), PerimeterError> {
        if !self.oracle.is_walkable(origin) {
            log::debug!("rejected start at unwalkable origin {origin:?}");
            return Err(PerimeterError::UnwalkableOrigin);
        }
        let origin = self.oracle.snap_to_cell_center(origin);

        self.release_session();
        self.events.clear();
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.origin = origin;
        self.events.push(PerimeterEvent::Started { origin });
        log::info!("potential area started at {origin:?}");

        if let Some(id) = self.registry.activate(&mut self.pool, Cell::ORIGIN, origin, 0.0) {
            self.outside.insert(ExpansionEntry::single(id, 0.0));
            self.attach_sensor(id);
        }
        self.state = EngineState::Expanding;

        if let Some(initial) = self.config.initial_potential() {
            self.movement_potential = initial;
        }
        self.resolve_due_expansions();
        Ok(())
    }

    /// Ends a running or settled session and releases its resources. No-op when idle.
    pub fn stop(&mut self) {
        if self.state == EngineState::Idle {
            return;
        }
        let potential = self.movement_potential;
        self.release_session();
        self.events.push(PerimeterEvent::Stopped);
        log::debug!("potential area stopped at potential {potential}");
    }

    /// Returns every node, sensor, and marker to the pool and resets the session.
    pub fn clear(&mut self) {
        self.release_session();
        self.events.push(PerimeterEvent::Cleared);
        log::debug!("potential area cleared");
    }

    fn release_session(&mut self) {
        for (_, sensor) in self.sensors.drain() {
            self.pool.release_sensor(sensor);
        }
        for (_, marker) in self.markers.drain() {
            self.pool.release_marker(marker);
        }
        self.registry.release_all(&mut self.pool);
        self.outside.clear();
        self.inside.clear();
        self.state = EngineState::Idle;
        self.movement_potential = 0.0;
        self.outside_timer = NO_PENDING_COST;
        self.inside_timer = NO_PENDING_COST;
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &PerimeterConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn pool(&self) -> &PerimeterPool {
        &self.pool
    }

    pub fn origin(&self) -> WorldPos {
        self.origin
    }

    pub fn movement_potential(&self) -> f32 {
        self.movement_potential
    }

    /// Potentials at which the outside and inside queues next expand.
    pub fn timers(&self) -> (f32, f32) {
        (self.outside_timer, self.inside_timer)
    }

    pub fn events(&self) -> &[PerimeterEvent] {
        &self.events
    }

    pub fn outside_queue(&self) -> &FrontierQueue {
        &self.outside
    }

    pub fn inside_queue(&self) -> &FrontierQueue {
        &self.inside
    }

    pub fn node_count(&self) -> usize {
        self.registry.len()
    }

    pub fn unsearched_count(&self) -> usize {
        self.nodes().filter(|(_, node)| !node.searched).count()
    }

    /// Nodes in activation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &PotentialNode)> + '_ {
        self.registry.iter(&self.pool)
    }

    pub fn node(&self, id: NodeId) -> Option<&PotentialNode> {
        self.pool.node(id)
    }

    pub fn sensors(&self) -> impl Iterator<Item = (SensorId, &SensorZone)> + '_ {
        self.sensors.values().filter_map(|id| self.pool.sensor(*id).map(|zone| (*id, zone)))
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    pub fn sensor_for(&self, node: NodeId) -> Option<SensorId> {
        self.sensors.get(node).copied()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u32(self.movement_potential.to_bits());
        hasher.write_u8(self.state as u8);
        for (id, node) in self.nodes() {
            hasher.write_i32(node.cell.x);
            hasher.write_i32(node.cell.y);
            hasher.write_u32(node.cost.to_bits());
            hasher.write_u8(u8::from(node.searched));
            hasher.write_u8(u8::from(self.sensors.contains_key(id)));
        }
        hasher.write_usize(self.outside.count());
        hasher.write_usize(self.inside.count());
        hasher.finish()
    }

    /// Checks every structural invariant. An `Err` means the engine itself is broken.
    pub fn verify_invariants(&self) -> Result<(), IntegrityViolation> {
        self.registry.check_integrity(&self.pool)?;
        for (node_id, sensor_id) in &self.sensors {
            let Some(node) = self.pool.node(node_id) else {
                return Err(IntegrityViolation::SensorBindingMismatch { cell: Cell::ORIGIN });
            };
            if node.searched {
                return Err(IntegrityViolation::SensorOnSearchedNode { cell: node.cell });
            }
            if self.pool.sensor(*sensor_id).map(|zone| zone.node) != Some(node_id) {
                return Err(IntegrityViolation::SensorBindingMismatch { cell: node.cell });
            }
        }
        if self.pool.sensors().len() != self.sensors.len() {
            let cell = self
                .pool
                .sensors()
                .iter()
                .find(|(id, zone)| self.sensors.get(zone.node) != Some(id))
                .map_or(Cell::ORIGIN, |(_, zone)| zone.cell);
            return Err(IntegrityViolation::SensorBindingMismatch { cell });
        }
        if !self.outside.is_sorted() {
            return Err(IntegrityViolation::QueueOutOfOrder { queue: "outside" });
        }
        if !self.inside.is_sorted() {
            return Err(IntegrityViolation::QueueOutOfOrder { queue: "inside" });
        }
        Ok(())
    }

    fn cell_world(&self, cell: Cell) -> WorldPos {
        let diameter = self.config.node_diameter();
        self.origin.shifted(cell.x as f32 * diameter, cell.y as f32 * diameter)
    }

    fn attach_sensor(&mut self, node_id: NodeId) {
        if self.sensors.contains_key(node_id) {
            return;
        }
        let Some(node) = self.pool.node(node_id) else {
            return;
        };
        if node.searched {
            return;
        }
        let (cell, position) = (node.cell, node.world);
        let radius = self.config.sensor_radius();
        let sensor = self.pool.acquire_sensor(node_id, cell, position, radius);
        self.sensors.insert(node_id, sensor);
    }

    fn detach_sensor(&mut self, node_id: NodeId) {
        if let Some(sensor) = self.sensors.remove(node_id) {
            self.pool.release_sensor(sensor);
        }
    }
}
