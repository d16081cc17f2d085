// src/candidate_generation/index.rs

use std::collections::{BTreeMap, BTreeSet};

use crate::clustering::cluster::{Address, RecordId};

/// Bipartite address <-> record relation.
///
/// Ordered maps keep every downstream iteration, and so the greedy
/// clustering result, reproducible across runs.
#[derive(Debug, Default, Clone)]
pub struct ActivityIndex {
    pub address_records: BTreeMap<Address, BTreeSet<RecordId>>,
    pub record_addresses: BTreeMap<RecordId, BTreeSet<Address>>,
}

impl ActivityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: &str, record: &str) {
        self.address_records
            .entry(address.to_string())
            .or_default()
            .insert(record.to_string());
        self.record_addresses
            .entry(record.to_string())
            .or_default()
            .insert(address.to_string());
    }

    pub fn address_count(&self) -> usize {
        self.address_records.len()
    }

    pub fn record_count(&self) -> usize {
        self.record_addresses.len()
    }

    /// Keeps addresses seen on more than `min_address_records` records and
    /// records shared by more than `min_record_addresses` addresses.
    ///
    /// Surviving entries keep their full neighbour sets; only the keys are
    /// filtered.
    pub fn prune(&self, min_address_records: usize, min_record_addresses: usize) -> PrunedIndex {
        let addresses = self
            .address_records
            .iter()
            .filter(|(_, records)| records.len() > min_address_records)
            .map(|(address, records)| (address.clone(), records.clone()))
            .collect();
        let records = self
            .record_addresses
            .iter()
            .filter(|(_, addresses)| addresses.len() > min_record_addresses)
            .map(|(record, addresses)| (record.clone(), addresses.clone()))
            .collect();
        PrunedIndex { addresses, records }
    }
}

/// The qualifying part of an [`ActivityIndex`].
#[derive(Debug, Default, Clone)]
pub struct PrunedIndex {
    pub addresses: BTreeMap<Address, BTreeSet<RecordId>>,
    pub records: BTreeMap<RecordId, BTreeSet<Address>>,
}
