//! Error types for the intersection engine.

use chrono::{DateTime, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Failure reported by a [`ProximityIndex`](crate::storage::ProximityIndex).
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index unavailable: {0}")]
    Unavailable(String),
    #[error("malformed index response: {0}")]
    Malformed(String),
    #[error("no position data indexed for {0}")]
    NoData(DateTime<Utc>),
}

/// Failure reported by a [`PositionStore`](crate::storage::PositionStore).
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("no position data for {0}")]
    NotFound(DateTime<Utc>),
    #[error("position store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or degenerate time window or step.
    #[error("invalid window: {0}")]
    InvalidWindow(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// A single proximity query failed; fails the enclosing window.
    #[error("proximity query at {instant} failed: {source}")]
    QueryFailed {
        instant: DateTime<Utc>,
        #[source]
        source: IndexError,
    },

    #[error("position lookup failed: {0}")]
    Position(#[from] PositionError),

    /// One target of a multi-target batch failed; the batch fails with it.
    #[error("target `{identity}` failed: {source}")]
    PartialBatch {
        identity: String,
        #[source]
        source: Box<EngineError>,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// The underlying error, looking through batch wrappers.
    pub fn root(&self) -> &EngineError {
        match self {
            Self::PartialBatch { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the caller sent something the engine cannot evaluate.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self.root(),
            Self::InvalidWindow(_) | Self::InvalidTarget(_)
        )
    }
}
