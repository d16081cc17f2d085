//! Groups network addresses into clusters by the activity records they share.
//!
//! Addresses co-occurring on enough records are unioned greedily, one pair at
//! a time; clusters that stay separate but keep getting cross-linked are
//! merged once the link strength reaches a threshold.

pub mod candidate_generation;
pub mod clustering;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use clustering::{Assignment, ClusterId, ClusterReport, ClusteringSession};
pub use error::ClusterError;
pub use pipeline::{run_pipeline, PipelineOptions, PipelineOutput};
pub use utils::clustering_config::ClusteringConfig;
