//! Price movement markers.
use serde::{Deserialize, Serialize};

/// Direction of a movement marker, read from its class list.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Unchanged,
}

/// One movement marker: the printed value and its direction.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementEntry {
    pub value: String,
    pub direction: Direction,
}
