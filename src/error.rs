// src/error.rs

//! Error types for the clustering engine

use thiserror::Error;

use crate::clustering::cluster::ClusterId;

pub type Result<T> = std::result::Result<T, ClusterError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    /// The id was merged away or never allocated.
    #[error("Cluster not found: {0}")]
    NotFound(ClusterId),

    #[error("Invalid pair ({address_a}, {address_b}): {reason}")]
    InvalidPair {
        address_a: String,
        address_b: String,
        reason: &'static str,
    },

    #[error("Invariant violated: {0}")]
    Invariant(String),
}
