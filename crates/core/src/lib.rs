pub mod config;
pub mod engine;
pub mod grid;
pub mod journal;
pub mod pool;
pub mod queue;
pub mod registry;
pub mod replay;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{PerimeterConfig, PoolCapacities};
pub use engine::PerimeterEngine;
pub use grid::{WalkabilityOracle, WalkableGrid};
pub use journal::{InputPayload, InputRecord, JOURNAL_FORMAT_VERSION, SessionJournal};
pub use pool::{Marker, PerimeterPool, PoolStats, PotentialNode, SensorZone};
pub use queue::{ExpansionEntry, FrontierQueue};
pub use replay::*;
pub use types::*;
