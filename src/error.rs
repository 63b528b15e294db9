//! Error types

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors surfaced by the visualizer and its configuration layer
#[derive(Debug, Error)]
pub enum VisError {
    /// The particle buffer could not be grown to hold the working set.
    /// Fatal for the owning visualizer: it cannot render without a correctly
    /// sized buffer.
    #[error("failed to grow particle buffer to {requested} records: {source}")]
    BufferGrowth {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("invalid settings: {0}")]
    Config(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VisError>;
