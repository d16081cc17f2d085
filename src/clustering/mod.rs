// src/clustering/mod.rs

pub mod assign;
pub mod cluster;
pub mod links;
pub mod merge;
pub mod report;
pub mod run;
pub mod session;
pub mod store;

pub use assign::Assignment;
pub use cluster::{Address, Cluster, ClusterId, RecordId};
pub use links::{ClusterLink, LinkLedger};
pub use report::{build_reports, ClusterReport};
pub use run::run_clustering;
pub use session::ClusteringSession;
pub use store::ClusterStore;
