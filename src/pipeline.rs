// src/pipeline.rs

use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::MultiProgress;
use log::info;
use std::time::Instant;
use uuid::Uuid;

use crate::candidate_generation::index::ActivityIndex;
use crate::candidate_generation::input::InputStats;
use crate::candidate_generation::pairs::generate_pairs;
use crate::clustering::report::{build_reports, ClusterReport};
use crate::clustering::run::run_clustering;
use crate::clustering::session::ClusteringSession;
use crate::models::stats_models::ClusteringStats;
use crate::utils::clustering_config::ClusteringConfig;

/// Result of a full run: reported clusters plus run statistics.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub stats: ClusteringStats,
    pub clusters: Vec<ClusterReport>,
    pub session: ClusteringSession,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Check partition and ledger invariants after the pass.
    pub verify: bool,
}

/// Prunes the index, builds pairs, clusters them and collects the report.
pub fn run_pipeline(
    index: &ActivityIndex,
    input_stats: InputStats,
    config: &ClusteringConfig,
    options: PipelineOptions,
    multi_progress: Option<&MultiProgress>,
) -> Result<PipelineOutput> {
    config.validate().context("Invalid clustering configuration")?;
    let run_start = Instant::now();
    let mut stats = ClusteringStats::new(Uuid::new_v4().to_string(), Utc::now().naive_utc());
    stats.rows_read = input_stats.rows_read;
    stats.rows_skipped = input_stats.rows_skipped;
    stats.total_addresses = index.address_count();
    stats.total_records = index.record_count();

    info!("Pruning sets...");
    let phase_start = Instant::now();
    let pruned = index.prune(config.min_address_records, config.min_record_addresses);
    stats.qualifying_addresses = pruned.addresses.len();
    stats.qualifying_records = pruned.records.len();
    stats.index_time = phase_start.elapsed().as_secs_f64();
    info!(
        "Kept {}/{} addresses and {}/{} records after pruning",
        stats.qualifying_addresses,
        stats.total_addresses,
        stats.qualifying_records,
        stats.total_records
    );

    info!("Building address relationships...");
    let phase_start = Instant::now();
    let (pairs, pair_stats) = generate_pairs(
        &pruned,
        config.min_shared_records,
        config.pair_order,
        multi_progress,
    );
    stats.candidate_pairs = pair_stats.candidate_pairs;
    stats.pairs_below_min_shared = pair_stats.below_min_shared;
    stats.pair_generation_time = phase_start.elapsed().as_secs_f64();

    info!("Creating clusters...");
    let phase_start = Instant::now();
    let mut session = ClusteringSession::new(config.merge_threshold);
    stats.assignments = run_clustering(&mut session, &pairs, multi_progress)?;
    stats.clustering_time = phase_start.elapsed().as_secs_f64();

    if options.verify {
        session
            .verify()
            .context("Cluster invariants violated after clustering pass")?;
        info!("Partition and link invariants verified");
    }

    let clusters = build_reports(&session, config.min_cluster_size);
    stats.clusters_allocated = session.store().allocated_count();
    stats.live_clusters = session.store().live_count();
    stats.reported_clusters = clusters.len();
    stats.remaining_links = session.ledger().len();
    stats.total_processing_time = run_start.elapsed().as_secs_f64();
    info!(
        "Removed {} clusters (less than {} addresses)",
        stats.live_clusters - stats.reported_clusters,
        config.min_cluster_size
    );

    Ok(PipelineOutput {
        stats,
        clusters,
        session,
    })
}
