// src/utils/clustering_config.rs

use anyhow::{bail, Result};
use log::{info, warn};
use std::env;
use std::str::FromStr;

use crate::candidate_generation::pairs::PairOrder;
use crate::utils::constants::{
    DEFAULT_MERGE_THRESHOLD, DEFAULT_MIN_ADDRESS_RECORDS, DEFAULT_MIN_CLUSTER_SIZE,
    DEFAULT_MIN_RECORD_ADDRESSES, DEFAULT_MIN_SHARED_RECORDS,
};

/// Thresholds that drive pruning, pair selection, merging and reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteringConfig {
    /// Link count at which two clusters are merged
    pub merge_threshold: u64,
    /// Minimum shared records for a pair to be submitted
    pub min_shared_records: usize,
    /// Addresses need strictly more records than this
    pub min_address_records: usize,
    /// Records need strictly more addresses than this
    pub min_record_addresses: usize,
    /// Smallest cluster kept in the report
    pub min_cluster_size: usize,
    pub pair_order: PairOrder,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            merge_threshold: DEFAULT_MERGE_THRESHOLD,
            min_shared_records: DEFAULT_MIN_SHARED_RECORDS,
            min_address_records: DEFAULT_MIN_ADDRESS_RECORDS,
            min_record_addresses: DEFAULT_MIN_RECORD_ADDRESSES,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            pair_order: PairOrder::default(),
        }
    }
}

impl ClusteringConfig {
    pub fn from_env() -> Self {
        Self {
            merge_threshold: env_or("CLUSTER_MERGE_THRESHOLD", DEFAULT_MERGE_THRESHOLD),
            min_shared_records: env_or("CLUSTER_MIN_SHARED_RECORDS", DEFAULT_MIN_SHARED_RECORDS),
            min_address_records: env_or("CLUSTER_MIN_ADDRESS_RECORDS", DEFAULT_MIN_ADDRESS_RECORDS),
            min_record_addresses: env_or(
                "CLUSTER_MIN_RECORD_ADDRESSES",
                DEFAULT_MIN_RECORD_ADDRESSES,
            ),
            min_cluster_size: env_or("CLUSTER_MIN_SIZE", DEFAULT_MIN_CLUSTER_SIZE),
            pair_order: env_or("CLUSTER_PAIR_ORDER", PairOrder::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.merge_threshold == 0 {
            bail!("merge threshold must be at least 1");
        }
        if self.min_shared_records == 0 {
            bail!("minimum shared records must be at least 1");
        }
        Ok(())
    }

    pub fn log_config(&self) {
        info!("🔗 Clustering configuration:");
        info!("   Merge threshold: {} links", self.merge_threshold);
        info!("   Minimum shared records per pair: {}", self.min_shared_records);
        info!(
            "   Pruning: addresses with > {} records, records with > {} addresses",
            self.min_address_records, self.min_record_addresses
        );
        info!("   Minimum reported cluster size: {}", self.min_cluster_size);
        info!("   Pair order: {}", self.pair_order);
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring unparseable {}={:?}, using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}
