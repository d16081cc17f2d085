// src/clustering/run.rs

use anyhow::{Context, Result};
use indicatif::MultiProgress;
use log::info;

use crate::candidate_generation::pairs::AddressPair;
use crate::clustering::session::ClusteringSession;
use crate::models::stats_models::AssignmentTally;
use crate::utils::progress_config::stage_bar;

/// Feeds `pairs` through the assignment engine in order.
///
/// Each pair's assign-then-merge cycle completes before the next pair is
/// looked at. The first engine error aborts the pass, tagged with the pair
/// that caused it.
pub fn run_clustering(
    session: &mut ClusteringSession,
    pairs: &[AddressPair],
    multi_progress: Option<&MultiProgress>,
) -> Result<AssignmentTally> {
    let pb = stage_bar(multi_progress, pairs.len() as u64, "Creating clusters...");
    let mut tally = AssignmentTally::default();

    for (i, pair) in pairs.iter().enumerate() {
        let outcome = session
            .assign(&pair.address_a, &pair.address_b, &pair.shared_records)
            .with_context(|| {
                format!(
                    "Clustering failed at pair {} ({}, {}) with {} shared records",
                    i,
                    pair.address_a,
                    pair.address_b,
                    pair.shared_records.len()
                )
            })?;
        tally.record(&outcome);

        if let Some(pb) = &pb {
            pb.inc(1);
            if i % 10_000 == 0 {
                pb.set_message(format!(
                    "Creating clusters... ({} live)",
                    session.store().live_count()
                ));
            }
        }
    }

    if let Some(pb) = &pb {
        pb.finish_with_message(format!(
            "{} clusters from {} pairs",
            session.store().live_count(),
            pairs.len()
        ));
    }
    info!(
        "Found {} clusters ({} created, {} merged away, {} links outstanding)",
        session.store().live_count(),
        tally.created,
        tally.merges,
        session.ledger().len()
    );
    Ok(tally)
}
