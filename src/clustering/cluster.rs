// src/clustering/cluster.rs

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// An entity identifier being clustered (e.g. an IP address).
pub type Address = String;

/// An activity identifier that links addresses co-occurring on it.
pub type RecordId = String;

/// Dense, monotonically assigned cluster identifier. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClusterId(pub usize);

impl ClusterId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A partition cell: the addresses believed to belong to one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub id: ClusterId,
    pub members: HashSet<Address>,
    /// Co-occurrence tally per record, not a membership test.
    pub record_counts: HashMap<RecordId, u64>,
    /// Pairwise relations absorbed directly into this cluster.
    pub internal_connections: u64,
}

impl Cluster {
    pub fn new<I>(id: ClusterId, members: I, internal_connections: u64) -> Self
    where
        I: IntoIterator<Item = Address>,
    {
        Self {
            id,
            members: members.into_iter().collect(),
            record_counts: HashMap::new(),
            internal_connections,
        }
    }

    pub fn contains(&self, address: &str) -> bool {
        self.members.contains(address)
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn bump_record(&mut self, record: &str) {
        self.bump_record_by(record, 1);
    }

    pub fn bump_record_by(&mut self, record: &str, n: u64) {
        match self.record_counts.get_mut(record) {
            Some(count) => *count += n,
            None => {
                self.record_counts.insert(record.to_string(), n);
            }
        }
    }

    pub fn bump_records<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a RecordId>,
    {
        for record in records {
            self.bump_record(record);
        }
    }

    /// Records ordered by descending count, ties by record id.
    pub fn top_records(&self, limit: usize) -> Vec<(RecordId, u64)> {
        let mut sorted: Vec<(RecordId, u64)> = self
            .record_counts
            .iter()
            .map(|(record, &count)| (record.clone(), count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sorted.truncate(limit);
        sorted
    }
}
