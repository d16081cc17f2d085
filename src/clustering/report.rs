// src/clustering/report.rs

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::clustering::cluster::{Address, Cluster, ClusterId, RecordId};
use crate::clustering::session::ClusteringSession;
use crate::utils::constants::REPORT_TOP_RECORDS;

/// Strength of a link from a reported cluster to another live cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSummary {
    pub cluster_id: ClusterId,
    pub strength: u64,
    pub shared_records: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordCount {
    pub record: RecordId,
    pub count: u64,
}

/// Final view of one live cluster, ready for printing or serialization.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterReport {
    pub id: ClusterId,
    pub size: usize,
    pub members: Vec<Address>,
    pub internal_connections: u64,
    pub links: Vec<LinkSummary>,
    pub top_records: Vec<RecordCount>,
    pub record_counts: BTreeMap<RecordId, u64>,
}

impl ClusterReport {
    fn from_cluster(cluster: &Cluster, session: &ClusteringSession) -> Self {
        let mut members: Vec<Address> = cluster.members.iter().cloned().collect();
        members.sort();

        let links = session
            .ledger()
            .links_of(cluster.id)
            .into_iter()
            .map(|(other, link)| LinkSummary {
                cluster_id: other,
                strength: link.count,
                shared_records: link.records.len(),
            })
            .collect();

        let top_records = cluster
            .top_records(REPORT_TOP_RECORDS)
            .into_iter()
            .map(|(record, count)| RecordCount { record, count })
            .collect();

        Self {
            id: cluster.id,
            size: cluster.size(),
            members,
            internal_connections: cluster.internal_connections,
            links,
            top_records,
            record_counts: cluster
                .record_counts
                .iter()
                .map(|(record, &count)| (record.clone(), count))
                .collect(),
        }
    }
}

/// Live clusters with at least `min_size` members, largest first.
///
/// Equal sizes are ordered by cluster id so repeated runs print identically.
pub fn build_reports(session: &ClusteringSession, min_size: usize) -> Vec<ClusterReport> {
    let mut reports: Vec<ClusterReport> = session
        .clusters()
        .filter(|cluster| cluster.size() >= min_size)
        .map(|cluster| ClusterReport::from_cluster(cluster, session))
        .collect();
    reports.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.id.cmp(&b.id)));
    reports
}

impl fmt::Display for ClusterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cluster {}", self.id)?;
        writeln!(f, "============")?;
        writeln!(f, "{} addresses:", self.size)?;
        writeln!(f, "{}", self.members.join(", "))?;
        writeln!(f)?;
        writeln!(f, "{} internal connections", self.internal_connections)?;
        if !self.links.is_empty() {
            let linked: Vec<String> = self
                .links
                .iter()
                .map(|link| format!("{} ({})", link.cluster_id, link.strength))
                .collect();
            writeln!(f)?;
            writeln!(f, "Connected clusters: {}", linked.join(", "))?;
        }
        writeln!(f)?;
        writeln!(f, "{} records", self.record_counts.len())?;
        let popular: Vec<String> = self
            .top_records
            .iter()
            .map(|rc| format!("{} ({})", rc.record, rc.count))
            .collect();
        write!(f, "Most popular:\n{}", popular.join(", "))
    }
}
