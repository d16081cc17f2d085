// src/clustering/session.rs

use log::debug;

use crate::clustering::cluster::{Cluster, ClusterId};
use crate::clustering::links::LinkLedger;
use crate::clustering::store::ClusterStore;
use crate::error::{ClusterError, Result};
use crate::utils::constants::DEFAULT_MERGE_THRESHOLD;

/// All mutable state of one clustering run.
///
/// Pairs must be fed one at a time: a merge retires a cluster id that the
/// next pair has to see as gone. Independent runs use independent sessions.
#[derive(Debug, Clone)]
pub struct ClusteringSession {
    pub(crate) store: ClusterStore,
    pub(crate) ledger: LinkLedger,
    pub(crate) merge_threshold: u64,
}

impl Default for ClusteringSession {
    fn default() -> Self {
        Self::new(DEFAULT_MERGE_THRESHOLD)
    }
}

impl ClusteringSession {
    pub fn new(merge_threshold: u64) -> Self {
        Self {
            store: ClusterStore::new(),
            ledger: LinkLedger::new(),
            merge_threshold,
        }
    }

    pub fn merge_threshold(&self) -> u64 {
        self.merge_threshold
    }

    pub fn store(&self) -> &ClusterStore {
        &self.store
    }

    pub fn ledger(&self) -> &LinkLedger {
        &self.ledger
    }

    pub fn cluster(&self, id: ClusterId) -> Result<&Cluster> {
        self.store.get(id)
    }

    pub fn cluster_of(&self, address: &str) -> Option<&Cluster> {
        self.store
            .cluster_of(address)
            .and_then(|id| self.store.get(id).ok())
    }

    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.store.live()
    }

    /// Drops every cluster and link; ids start from zero again.
    pub fn reset(&mut self) {
        debug!(
            "Resetting clustering session ({} live clusters, {} links)",
            self.store.live_count(),
            self.ledger.len()
        );
        self.store.clear();
        self.ledger.clear();
    }

    /// Checks the partition and ledger invariants.
    ///
    /// Every indexed address must sit in exactly one live cluster, every
    /// member of a live cluster must be indexed to it, and no link may name
    /// a retired cluster.
    pub fn verify(&self) -> Result<()> {
        let mut member_total = 0usize;
        for cluster in self.store.live() {
            for member in &cluster.members {
                match self.store.cluster_of(member) {
                    Some(id) if id == cluster.id => {}
                    Some(other) => {
                        return Err(ClusterError::Invariant(format!(
                            "address {} is in cluster {} but indexed to {}",
                            member, cluster.id, other
                        )))
                    }
                    None => {
                        return Err(ClusterError::Invariant(format!(
                            "address {} of cluster {} is not indexed",
                            member, cluster.id
                        )))
                    }
                }
            }
            member_total += cluster.size();
        }

        if member_total != self.store.address_count() {
            return Err(ClusterError::Invariant(format!(
                "{} cluster memberships for {} indexed addresses",
                member_total,
                self.store.address_count()
            )));
        }

        for (address, &id) in self.store.membership() {
            if !self.store.get(id)?.contains(address) {
                return Err(ClusterError::Invariant(format!(
                    "address {} indexed to cluster {} which does not contain it",
                    address, id
                )));
            }
        }

        for id in self.ledger.referenced_ids() {
            if !self.store.is_live(id) {
                return Err(ClusterError::Invariant(format!(
                    "link ledger references retired cluster {}",
                    id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::assign::Assignment;
    use crate::clustering::cluster::RecordId;

    fn recs(list: &[&str]) -> Vec<RecordId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reset_starts_a_fresh_run() {
        let mut session = ClusteringSession::new(2);
        session.assign("a1", "a2", &recs(&["r1", "r2", "r3"])).unwrap();
        session.assign("b1", "b2", &recs(&["r4", "r5", "r6"])).unwrap();
        session.assign("c1", "c2", &recs(&["r7", "r8", "r9"])).unwrap();
        session.assign("a1", "c1", &recs(&["y1", "y2", "y3"])).unwrap();
        session.assign("a1", "b1", &recs(&["x1", "x2", "x3"])).unwrap();
        let outcome = session.assign("a2", "b2", &recs(&["x1", "x2", "x3"])).unwrap();
        assert!(outcome.merged());
        assert!(!session.ledger().is_empty());

        session.reset();

        assert_eq!(session.clusters().count(), 0);
        assert!(session.ledger().is_empty());
        assert_eq!(session.store().address_count(), 0);
        assert!(session.cluster_of("a1").is_none());
        assert_eq!(session.merge_threshold(), 2);
        session.verify().unwrap();

        let outcome = session.assign("z1", "z2", &recs(&["r1", "r2", "r3"])).unwrap();
        assert_eq!(outcome, Assignment::Created(ClusterId(0)));
        assert_eq!(session.store().allocated_count(), 1);
        session.verify().unwrap();
    }

    #[test]
    fn test_verify_flags_link_to_retired_cluster() {
        let mut session = ClusteringSession::default();
        session.assign("a1", "a2", &recs(&["r1", "r2", "r3"])).unwrap();
        session.assign("b1", "b2", &recs(&["r4", "r5", "r6"])).unwrap();
        session.assign("a1", "b1", &recs(&["x1", "x2", "x3"])).unwrap();
        session.verify().unwrap();

        let b = session.store().cluster_of("b1").unwrap();
        let retired = session.store.retire(b).unwrap();
        session.store.repoint_members(&retired, ClusterId(0));
        session.store.get_mut(ClusterId(0)).unwrap().members.extend(retired.members);

        assert!(matches!(session.verify(), Err(ClusterError::Invariant(_))));
    }
}
