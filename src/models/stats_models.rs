// src/models/stats_models.rs

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::clustering::assign::Assignment;

/// How many pairs took each branch of the assignment procedure.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignmentTally {
    pub pairs_assigned: usize,
    pub internal: usize,
    pub linked: usize,
    pub extended: usize,
    pub created: usize,
    pub merges: usize,
}

impl AssignmentTally {
    pub fn record(&mut self, outcome: &Assignment) {
        self.pairs_assigned += 1;
        match outcome {
            Assignment::Internal(_) => self.internal += 1,
            Assignment::Linked { merged, .. } => {
                self.linked += 1;
                if *merged {
                    self.merges += 1;
                }
            }
            Assignment::Extended(_) => self.extended += 1,
            Assignment::Created(_) => self.created += 1,
        }
    }
}

/// Summary of one clustering run.
#[derive(Debug, Clone, Serialize)]
pub struct ClusteringStats {
    pub run_id: String,
    pub run_timestamp: NaiveDateTime,
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub total_addresses: usize,
    pub total_records: usize,
    pub qualifying_addresses: usize,
    pub qualifying_records: usize,
    pub candidate_pairs: usize,
    pub pairs_below_min_shared: usize,
    pub assignments: AssignmentTally,
    pub clusters_allocated: usize,
    pub live_clusters: usize,
    pub reported_clusters: usize,
    pub remaining_links: usize,
    pub index_time: f64,
    pub pair_generation_time: f64,
    pub clustering_time: f64,
    pub total_processing_time: f64,
}

impl ClusteringStats {
    pub fn new(run_id: String, run_timestamp: NaiveDateTime) -> Self {
        Self {
            run_id,
            run_timestamp,
            rows_read: 0,
            rows_skipped: 0,
            total_addresses: 0,
            total_records: 0,
            qualifying_addresses: 0,
            qualifying_records: 0,
            candidate_pairs: 0,
            pairs_below_min_shared: 0,
            assignments: AssignmentTally::default(),
            clusters_allocated: 0,
            live_clusters: 0,
            reported_clusters: 0,
            remaining_links: 0,
            index_time: 0.0,
            pair_generation_time: 0.0,
            clustering_time: 0.0,
            total_processing_time: 0.0,
        }
    }
}
