//! Error type shared by the catalog, agents, director and config loaders.
//!
//! Only content/configuration bugs and invariant breaches surface here.
//! Terrain collisions and placement misses are handled where they occur and
//! never produce an error.

use crate::archetype::Archetype;

#[derive(Debug, thiserror::Error)]
pub enum EncounterError {
    #[error("Unknown archetype: {0:?}")]
    UnknownArchetype(Archetype),
    #[error("Invalid archetype record for {archetype:?}: {reason}")]
    InvalidArchetype {
        archetype: Archetype,
        reason: String,
    },
    #[error("Phase thresholds must be strictly descending within (0, 1]: {0:?}")]
    NonDescendingThresholds(Vec<f32>),
    #[error("Weight table has zero total weight: {0}")]
    EmptyWeightTable(String),
    #[error("Weight table total overflows u32: {0}")]
    WeightOverflow(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EncounterResult<T> = Result<T, EncounterError>;
