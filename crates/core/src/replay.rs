use std::error::Error;
use std::fmt;

use crate::config::PerimeterConfig;
use crate::engine::PerimeterEngine;
use crate::grid::WalkabilityOracle;
use crate::journal::{InputPayload, SessionJournal};
use crate::pool::PerimeterPool;
use crate::types::{EngineState, PerimeterError};

#[derive(Debug, PartialEq)]
pub enum ReplayError {
    Engine(PerimeterError),
    /// A recorded start was refused by the oracle.
    StartRejected { seq: u64 },
    /// Sequence numbers must strictly increase.
    OutOfOrder { seq: u64 },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Engine(err) => write!(f, "engine could not be built: {err}"),
            ReplayError::StartRejected { seq } => {
                write!(f, "input {seq}: start position is not walkable")
            }
            ReplayError::OutOfOrder { seq } => write!(f, "input {seq} is out of sequence"),
        }
    }
}

impl Error for ReplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ReplayError::Engine(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct ReplayResult {
    pub final_state: EngineState,
    pub final_snapshot_hash: u64,
    pub final_potential: f32,
    pub node_count: usize,
    pub searched_count: usize,
}

/// Re-executes `journal` on a fresh engine. The journal's seed overrides `config.seed`.
pub fn replay_journal<O: WalkabilityOracle>(
    config: &PerimeterConfig,
    oracle: O,
    journal: &SessionJournal,
) -> Result<ReplayResult, ReplayError> {
    let config = PerimeterConfig { seed: journal.seed, ..config.clone() };
    let pool = PerimeterPool::new(&config.pool);
    let mut engine = PerimeterEngine::new(config, oracle, pool).map_err(ReplayError::Engine)?;

    let mut last_seq = None;
    for record in &journal.inputs {
        if last_seq.is_some_and(|last| record.seq <= last) {
            return Err(ReplayError::OutOfOrder { seq: record.seq });
        }
        last_seq = Some(record.seq);

        match &record.payload {
            InputPayload::Start { origin } => {
                if engine.start(*origin).is_err() {
                    return Err(ReplayError::StartRejected { seq: record.seq });
                }
            }
            InputPayload::Tick { elapsed } => engine.tick(*elapsed),
            InputPayload::Investigate { cell } => {
                if !engine.investigate_cell(*cell) {
                    log::debug!("replayed investigation of {cell:?} had no effect");
                }
            }
            InputPayload::Stop => engine.stop(),
            InputPayload::Clear => engine.clear(),
        }
    }

    Ok(ReplayResult {
        final_state: engine.state(),
        final_snapshot_hash: engine.snapshot_hash(),
        final_potential: engine.movement_potential(),
        node_count: engine.node_count(),
        searched_count: engine.node_count() - engine.unsearched_count(),
    })
}
