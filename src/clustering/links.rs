// src/clustering/links.rs

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::clustering::cluster::{ClusterId, RecordId};
use crate::error::{ClusterError, Result};

/// Aggregated cross-cluster co-occurrence between two live clusters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterLink {
    /// Pairwise relations that crossed the boundary.
    pub count: u64,
    /// Shared records behind those crossings.
    pub records: HashSet<RecordId>,
}

impl ClusterLink {
    fn absorb(&mut self, other: ClusterLink) {
        self.count += other.count;
        self.records.extend(other.records);
    }
}

/// Canonical storage key: lower id first.
fn link_key(a: ClusterId, b: ClusterId) -> (ClusterId, ClusterId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Registry of link strength between clusters.
///
/// Each unordered pair is stored once under its canonical key. `partners`
/// indexes both directions so a cluster's links, and the entries touched by
/// a merge, are found without scanning the whole ledger.
#[derive(Debug, Default, Clone)]
pub struct LinkLedger {
    links: HashMap<(ClusterId, ClusterId), ClusterLink>,
    partners: HashMap<ClusterId, HashSet<ClusterId>>,
}

impl LinkLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more crossing between `a` and `b` and unions its records.
    pub fn add_link<'a, I>(&mut self, a: ClusterId, b: ClusterId, shared_records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a RecordId>,
    {
        if a == b {
            return Err(ClusterError::Invariant(format!(
                "attempted to link cluster {} to itself",
                a
            )));
        }
        let link = self.links.entry(link_key(a, b)).or_default();
        link.count += 1;
        link.records.extend(shared_records.into_iter().cloned());
        self.partners.entry(a).or_default().insert(b);
        self.partners.entry(b).or_default().insert(a);
        Ok(())
    }

    /// The link between `a` and `b`, in either direction.
    pub fn link(&self, a: ClusterId, b: ClusterId) -> Option<&ClusterLink> {
        self.links.get(&link_key(a, b))
    }

    pub fn link_count(&self, a: ClusterId, b: ClusterId) -> u64 {
        self.link(a, b).map_or(0, |link| link.count)
    }

    /// Symmetric view of every link touching `id`, keyed by the other side.
    pub fn links_of(&self, id: ClusterId) -> BTreeMap<ClusterId, &ClusterLink> {
        let mut view = BTreeMap::new();
        if let Some(partners) = self.partners.get(&id) {
            for &other in partners {
                if let Some(link) = self.links.get(&link_key(id, other)) {
                    view.insert(other, link);
                }
            }
        }
        view
    }

    /// Re-targets every link of `from` onto `to`.
    ///
    /// Links to a neighbour `to` already knows are summed into the existing
    /// entry. The `from`-`to` link itself cannot survive as a self-link, so it
    /// is removed and handed back for the caller to fold into the merged
    /// cluster. No entry for `from` remains afterwards.
    pub fn rekey(&mut self, from: ClusterId, to: ClusterId) -> Option<ClusterLink> {
        if from == to {
            return None;
        }
        let mut folded = None;
        let partners = self.partners.remove(&from).unwrap_or_default();

        for other in partners {
            let Some(link) = self.links.remove(&link_key(from, other)) else {
                continue;
            };
            if let Some(back) = self.partners.get_mut(&other) {
                back.remove(&from);
            }
            if other == to {
                folded = Some(link);
                continue;
            }
            self.links.entry(link_key(to, other)).or_default().absorb(link);
            self.partners.entry(to).or_default().insert(other);
            self.partners.entry(other).or_default().insert(to);
        }

        if self.partners.get(&to).is_some_and(HashSet::is_empty) {
            self.partners.remove(&to);
        }
        folded
    }

    /// Every cluster id that currently appears on either end of a link.
    pub fn referenced_ids(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.links.keys().flat_map(|&(a, b)| [a, b])
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn clear(&mut self) {
        self.links.clear();
        self.partners.clear();
    }
}
