// src/candidate_generation/pairs.rs

use indicatif::MultiProgress;
use log::info;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::candidate_generation::index::PrunedIndex;
use crate::clustering::cluster::{Address, RecordId};
use crate::utils::progress_config::stage_bar;

/// Order in which candidate pairs reach the assignment engine.
///
/// Clustering is greedy, so this order shapes the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairOrder {
    /// Addresses in lexicographic order, each followed by its partners in
    /// lexicographic order.
    #[default]
    Address,
    /// Strongest pairs first (most shared records), ties in address order.
    SharedDesc,
}

impl FromStr for PairOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "address" => Ok(PairOrder::Address),
            "shared-desc" | "shared_desc" => Ok(PairOrder::SharedDesc),
            other => Err(format!(
                "unknown pair order '{}', expected 'address' or 'shared-desc'",
                other
            )),
        }
    }
}

impl fmt::Display for PairOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairOrder::Address => write!(f, "address"),
            PairOrder::SharedDesc => write!(f, "shared-desc"),
        }
    }
}

/// An ordered address pair with the qualifying records both appear on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressPair {
    pub address_a: Address,
    pub address_b: Address,
    pub shared_records: Vec<RecordId>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PairStats {
    /// Ordered pairs sharing at least one qualifying record
    pub candidate_pairs: usize,
    /// Pairs dropped for sharing too few records
    pub below_min_shared: usize,
}

/// Builds the ordered pairs to cluster.
///
/// For every qualifying address and every qualifying record it appears on,
/// each other address on that record forms a pair; shared records are
/// accumulated per pair. Both directions of a relation are emitted. Pairs
/// with fewer than `min_shared_records` shared records are dropped.
pub fn generate_pairs(
    pruned: &PrunedIndex,
    min_shared_records: usize,
    order: PairOrder,
    multi_progress: Option<&MultiProgress>,
) -> (Vec<AddressPair>, PairStats) {
    let pb = stage_bar(
        multi_progress,
        pruned.addresses.len() as u64,
        "Building address relationships...",
    );

    let mut stats = PairStats::default();
    let mut pairs = Vec::new();

    for (address, records) in &pruned.addresses {
        let mut related: BTreeMap<&Address, BTreeSet<&RecordId>> = BTreeMap::new();
        for record in records {
            let Some(addresses) = pruned.records.get(record) else {
                continue;
            };
            for other in addresses {
                if other != address {
                    related.entry(other).or_default().insert(record);
                }
            }
        }

        stats.candidate_pairs += related.len();
        for (other, shared) in related {
            if shared.len() < min_shared_records {
                stats.below_min_shared += 1;
                continue;
            }
            pairs.push(AddressPair {
                address_a: address.clone(),
                address_b: other.clone(),
                shared_records: shared.into_iter().cloned().collect(),
            });
        }

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if order == PairOrder::SharedDesc {
        // stable: equal counts keep address order
        pairs.sort_by(|a, b| b.shared_records.len().cmp(&a.shared_records.len()));
    }

    if let Some(pb) = &pb {
        pb.finish_with_message(format!("{} pairs qualified", pairs.len()));
    }
    info!(
        "Generated {} candidate pairs, {} qualify (>= {} shared records), {} dropped",
        stats.candidate_pairs,
        pairs.len(),
        min_shared_records,
        stats.below_min_shared
    );
    (pairs, stats)
}
