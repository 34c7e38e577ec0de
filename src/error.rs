//! Error types
//!
//! Gameplay failures (hazard hits, block collisions, mirror divergence) are
//! ordinary round outcomes and live in `sim::state::FailureReason`. The errors
//! here are precondition violations: bad level data or a caller bug.

use thiserror::Error;

use crate::sim::state::Side;

/// Simulation precondition violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("level {index} is out of range (catalog has {count} levels)")]
    LevelIndexOutOfRange { index: usize, count: usize },

    #[error("no blocks on the {side:?} side")]
    EmptyBlockCollection { side: Side },

    #[error("layout row {row} has {found} cells, expected {expected}")]
    RaggedLayout {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown layout cell code {code} at row {row}, column {col}")]
    UnknownCell { row: usize, col: usize, code: u8 },

    #[error("unknown checkpoint code {code} in mission list")]
    UnknownCheckpoint { code: u8 },

    #[error("level layout contains no blocks")]
    NoBlocks,

    #[error("primary and secondary sides hold different entity counts")]
    UnpairedEntities,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}
