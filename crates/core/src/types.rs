use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct NodeId;
    pub struct MarkerId;
    pub struct SensorId;
}

/// Movement potential needed for one orthogonal step.
pub const ORTHOGONAL_STEP_COST: f32 = 10.0;
/// Movement potential needed for one diagonal step (10 * sqrt 2, rounded).
pub const DIAGONAL_STEP_COST: f32 = 14.0;
/// Cost reported by an empty frontier queue. Larger than any real cost.
pub const NO_PENDING_COST: f32 = f32::INFINITY;

const ORTHOGONAL_OFFSETS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

/// Grid coordinate relative to the session origin, which is always `(0, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { x: 0, y: 0 };

    pub fn offset(self, dx: i32, dy: i32) -> Cell {
        Cell { x: self.x + dx, y: self.y + dy }
    }

    pub fn orthogonal_neighbors(self) -> [Cell; 4] {
        ORTHOGONAL_OFFSETS.map(|(dx, dy)| self.offset(dx, dy))
    }

    pub fn diagonal_neighbors(self) -> [Cell; 4] {
        DIAGONAL_OFFSETS.map(|(dx, dy)| self.offset(dx, dy))
    }

    /// Orthogonal neighbours first, then diagonal ones.
    pub fn all_neighbors(self) -> [Cell; 8] {
        let [a, b, c, d] = self.orthogonal_neighbors();
        let [e, f, g, h] = self.diagonal_neighbors();
        [a, b, c, d, e, f, g, h]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn shifted(self, dx: f32, dy: f32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Expanding,
    Settled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerKind {
    /// Node still sitting in one of the frontier queues.
    Active,
    /// Node whose expansion is complete.
    Inactive,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PerimeterEvent {
    Started { origin: WorldPos },
    Settled { movement_potential: f32, node_count: usize },
    NodeInvestigated { cell: Cell },
    Stopped,
    Cleared,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    NonPositiveNodeRadius,
    NonPositiveTargetRadius,
    NegativeTargetSpeed,
    NonPositiveSensorScale,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveNodeRadius => write!(f, "node_radius must be positive"),
            ConfigError::NonPositiveTargetRadius => write!(f, "target_radius must be positive"),
            ConfigError::NegativeTargetSpeed => write!(f, "target_speed must not be negative"),
            ConfigError::NonPositiveSensorScale => write!(f, "sensor_scale must be positive"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Clone, Debug, PartialEq)]
pub enum PerimeterError {
    UnwalkableOrigin,
    EmptyArea,
    InvalidConfig(ConfigError),
}

impl fmt::Display for PerimeterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerimeterError::UnwalkableOrigin => write!(f, "origin is not walkable"),
            PerimeterError::EmptyArea => write!(f, "potential area has no unsearched cells"),
            PerimeterError::InvalidConfig(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for PerimeterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PerimeterError::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for PerimeterError {
    fn from(err: ConfigError) -> Self {
        PerimeterError::InvalidConfig(err)
    }
}

/// Broken engine invariant. Never produced by a correct engine.
#[derive(Clone, Debug, PartialEq)]
pub enum IntegrityViolation {
    IndexPointsToMissingNode { cell: Cell },
    IndexCoordinateMismatch { cell: Cell, node_cell: Cell },
    NodeMissingFromIndex { cell: Cell },
    DuplicateCoordinate { cell: Cell },
    SensorOnSearchedNode { cell: Cell },
    SensorBindingMismatch { cell: Cell },
    QueueOutOfOrder { queue: &'static str },
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine invariant broken: {self:?}")
    }
}

impl Error for IntegrityViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_offsets_use_one_axis_convention() {
        let cell = Cell { x: 3, y: -2 };
        let orthogonal = cell.orthogonal_neighbors();
        assert!(orthogonal.contains(&Cell { x: 3, y: -3 }));
        assert!(orthogonal.contains(&Cell { x: 3, y: -1 }));
        assert!(orthogonal.contains(&Cell { x: 2, y: -2 }));
        assert!(orthogonal.contains(&Cell { x: 4, y: -2 }));

        for diagonal in cell.diagonal_neighbors() {
            assert_eq!(diagonal.x.abs_diff(cell.x), 1);
            assert_eq!(diagonal.y.abs_diff(cell.y), 1);
        }
    }

    #[test]
    fn all_neighbors_are_distinct() {
        let mut cells = Cell::ORIGIN.all_neighbors().to_vec();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 8);
        assert!(!cells.contains(&Cell::ORIGIN));
    }
}
