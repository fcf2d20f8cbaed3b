use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum SpillIndexError {
    /// An invalid build configuration was rejected before construction started.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A split could not shrink its range, even after the bisection fallback.
    #[error("Degenerate split of {count} points: {reason}")]
    Construction {
        /// The number of points in the range that could not be partitioned.
        count: usize,
        /// Why the range could not be partitioned.
        reason: String,
    },

    /// A query point's dimension did not match the tree's.
    #[error("Query has dimension {query_dim} but the tree has dimension {tree_dim}")]
    DimensionMismatch {
        /// The dimension of the rejected query point.
        query_dim: usize,
        /// The dimension the tree was built over.
        tree_dim: usize,
    },
}

pub type Result<T> = std::result::Result<T, SpillIndexError>;
