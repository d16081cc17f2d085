// src/clustering/assign.rs

use std::collections::BTreeSet;

use crate::clustering::cluster::{ClusterId, RecordId};
use crate::clustering::session::ClusteringSession;
use crate::error::{ClusterError, Result};

/// Which branch of the assignment procedure a pair took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Both addresses were already in this cluster.
    Internal(ClusterId),
    /// The addresses sat in different clusters; a link was recorded.
    Linked {
        cluster_a: ClusterId,
        cluster_b: ClusterId,
        merged: bool,
    },
    /// One address was unclustered and joined the other's cluster.
    Extended(ClusterId),
    /// Neither address was clustered.
    Created(ClusterId),
}

impl Assignment {
    pub fn merged(&self) -> bool {
        matches!(self, Assignment::Linked { merged: true, .. })
    }
}

impl ClusteringSession {
    /// Applies one qualifying address pair to the partition.
    ///
    /// `shared_records` is treated as a set and must be non-empty; callers
    /// filter pairs by the minimum shared-record count before submitting them.
    pub fn assign(
        &mut self,
        address_a: &str,
        address_b: &str,
        shared_records: &[RecordId],
    ) -> Result<Assignment> {
        if shared_records.is_empty() {
            return Err(invalid_pair(address_a, address_b, "no shared records"));
        }
        if address_a == address_b {
            return Err(invalid_pair(address_a, address_b, "address paired with itself"));
        }

        // duplicates in the input count once
        let records: BTreeSet<&RecordId> = shared_records.iter().collect();
        let cluster_a = self.store.cluster_of(address_a);
        let cluster_b = self.store.cluster_of(address_b);

        match (cluster_a, cluster_b) {
            (Some(a), Some(b)) if a == b => {
                self.bump_records(a, &records)?;
                self.store.bump_internal_connections(a, 1)?;
                Ok(Assignment::Internal(a))
            }
            (Some(a), Some(b)) => {
                self.ledger.add_link(a, b, records.iter().copied())?;
                self.bump_records(a, &records)?;
                self.bump_records(b, &records)?;
                let merged = self.maybe_merge(a, b)?;
                Ok(Assignment::Linked {
                    cluster_a: a,
                    cluster_b: b,
                    merged,
                })
            }
            (Some(existing), None) => self.extend(existing, address_b, &records),
            (None, Some(existing)) => self.extend(existing, address_a, &records),
            (None, None) => {
                let id = self
                    .store
                    .allocate([address_a.to_string(), address_b.to_string()], 1);
                self.bump_records(id, &records)?;
                Ok(Assignment::Created(id))
            }
        }
    }

    fn extend(
        &mut self,
        id: ClusterId,
        address: &str,
        records: &BTreeSet<&RecordId>,
    ) -> Result<Assignment> {
        self.store.add_member(id, address)?;
        self.bump_records(id, records)?;
        self.store.bump_internal_connections(id, 1)?;
        Ok(Assignment::Extended(id))
    }

    fn bump_records(&mut self, id: ClusterId, records: &BTreeSet<&RecordId>) -> Result<()> {
        for record in records {
            self.store.bump_record(id, record)?;
        }
        Ok(())
    }
}

fn invalid_pair(address_a: &str, address_b: &str, reason: &'static str) -> ClusterError {
    ClusterError::InvalidPair {
        address_a: address_a.to_string(),
        address_b: address_b.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recs(list: &[&str]) -> Vec<RecordId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_pair_creates_cluster() {
        let mut session = ClusteringSession::default();
        let outcome = session.assign("ip1", "ip2", &recs(&["r1", "r2", "r3"])).unwrap();

        let Assignment::Created(id) = outcome else {
            panic!("expected a new cluster, got {:?}", outcome);
        };
        let cluster = session.cluster(id).unwrap();
        assert_eq!(cluster.size(), 2);
        assert_eq!(cluster.internal_connections, 1);
        assert_eq!(cluster.record_counts.len(), 3);
    }

    #[test]
    fn test_shared_address_extends_cluster() {
        // ip1-ip2 then ip1-ip3 collapse into one cluster
        let mut session = ClusteringSession::default();
        session.assign("ip1", "ip2", &recs(&["r1", "r2", "r3"])).unwrap();
        let outcome = session.assign("ip1", "ip3", &recs(&["r1", "r4", "r5"])).unwrap();
        assert!(matches!(outcome, Assignment::Extended(_)));

        assert_eq!(session.clusters().count(), 1);
        let cluster = session.cluster_of("ip3").unwrap();
        let mut members: Vec<&str> = cluster.members.iter().map(String::as_str).collect();
        members.sort();
        assert_eq!(members, vec!["ip1", "ip2", "ip3"]);
        assert_eq!(cluster.internal_connections, 2);
        assert_eq!(cluster.record_counts.get("r1"), Some(&2));
        for record in ["r2", "r3", "r4", "r5"] {
            assert_eq!(cluster.record_counts.get(record), Some(&1), "record {}", record);
        }
    }

    #[test]
    fn test_second_address_clustered_extends_its_cluster() {
        let mut session = ClusteringSession::default();
        session.assign("ip1", "ip2", &recs(&["r1", "r2", "r3"])).unwrap();
        let outcome = session.assign("ip9", "ip2", &recs(&["r1", "r2", "r3"])).unwrap();

        let Assignment::Extended(id) = outcome else {
            panic!("expected extension, got {:?}", outcome);
        };
        assert!(session.cluster(id).unwrap().contains("ip9"));
        assert_eq!(session.store().cluster_of("ip9"), Some(id));
    }

    #[test]
    fn test_same_cluster_counts_internal_connection() {
        let mut session = ClusteringSession::default();
        session.assign("ip1", "ip2", &recs(&["r1", "r2", "r3"])).unwrap();
        let outcome = session.assign("ip2", "ip1", &recs(&["r1", "r2", "r3"])).unwrap();

        assert!(matches!(outcome, Assignment::Internal(_)));
        let cluster = session.cluster_of("ip1").unwrap();
        assert_eq!(cluster.internal_connections, 2);
        assert_eq!(cluster.record_counts.get("r2"), Some(&2));
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn test_cross_cluster_pair_records_link() {
        let mut session = ClusteringSession::default();
        session.assign("a1", "a2", &recs(&["r1", "r2", "r3"])).unwrap();
        session.assign("b1", "b2", &recs(&["r4", "r5", "r6"])).unwrap();
        let outcome = session.assign("a1", "b1", &recs(&["r7", "r8", "r9"])).unwrap();

        let Assignment::Linked { cluster_a, cluster_b, merged } = outcome else {
            panic!("expected link, got {:?}", outcome);
        };
        assert!(!merged);
        assert_eq!(session.ledger().link_count(cluster_a, cluster_b), 1);
        assert_eq!(session.cluster(cluster_a).unwrap().record_counts.get("r7"), Some(&1));
        assert_eq!(session.cluster(cluster_b).unwrap().record_counts.get("r7"), Some(&1));
        assert_eq!(session.cluster(cluster_a).unwrap().internal_connections, 1);
        assert_eq!(session.cluster(cluster_b).unwrap().internal_connections, 1);
    }

    #[test]
    fn test_invalid_pairs_rejected_without_state_change() {
        let mut session = ClusteringSession::default();
        assert!(matches!(
            session.assign("ip1", "ip2", &[]),
            Err(ClusterError::InvalidPair { .. })
        ));
        assert!(matches!(
            session.assign("ip1", "ip1", &recs(&["r1", "r2", "r3"])),
            Err(ClusterError::InvalidPair { .. })
        ));
        assert_eq!(session.clusters().count(), 0);
    }

    #[test]
    fn test_duplicate_shared_records_count_once() {
        let mut session = ClusteringSession::default();
        let outcome = session.assign("a1", "a2", &recs(&["r1", "r1", "r1"])).unwrap();
        let Assignment::Created(a) = outcome else {
            panic!("expected a new cluster, got {:?}", outcome);
        };
        assert_eq!(session.cluster(a).unwrap().record_counts.get("r1"), Some(&1));

        session.assign("b1", "b2", &recs(&["r4", "r5", "r6"])).unwrap();
        let outcome = session.assign("a1", "b1", &recs(&["x1", "x1", "x2"])).unwrap();
        let Assignment::Linked { cluster_b, .. } = outcome else {
            panic!("expected link, got {:?}", outcome);
        };
        assert_eq!(session.cluster(cluster_b).unwrap().record_counts.get("x1"), Some(&1));
        assert_eq!(session.ledger().link(a, cluster_b).unwrap().records.len(), 2);
    }
}
