// src/clustering/merge.rs

use log::debug;

use crate::clustering::cluster::ClusterId;
use crate::clustering::session::ClusteringSession;
use crate::error::Result;

impl ClusteringSession {
    /// Merges `cluster_b` into `cluster_a` once their link reaches the
    /// session's merge threshold. Returns whether a merge happened.
    pub fn maybe_merge(&mut self, cluster_a: ClusterId, cluster_b: ClusterId) -> Result<bool> {
        self.maybe_merge_with_threshold(cluster_a, cluster_b, self.merge_threshold())
    }

    /// Same as [`maybe_merge`](Self::maybe_merge) with an explicit threshold.
    ///
    /// Below the threshold, or without any link between the two, nothing is
    /// touched. Otherwise `cluster_a` survives:
    /// it takes the union of both member sets, the summed record counters,
    /// one count per record of the connecting link, and
    /// `cluster_b.internal_connections + link.count` extra internal
    /// connections. All of `cluster_b`'s other links move to `cluster_a` and
    /// `cluster_b` is retired.
    pub fn maybe_merge_with_threshold(
        &mut self,
        cluster_a: ClusterId,
        cluster_b: ClusterId,
        threshold: u64,
    ) -> Result<bool> {
        if cluster_a == cluster_b {
            return Ok(false);
        }
        self.store.get(cluster_a)?;
        self.store.get(cluster_b)?;

        let strength = self.ledger.link_count(cluster_a, cluster_b);
        // unlinked clusters never merge, whatever the threshold
        if strength == 0 || strength < threshold {
            return Ok(false);
        }

        let absorbed = self.store.retire(cluster_b)?;
        let link = self.ledger.rekey(cluster_b, cluster_a).unwrap_or_default();
        self.store.repoint_members(&absorbed, cluster_a);

        let survivor = self.store.get_mut(cluster_a)?;
        let absorbed_size = absorbed.size();
        survivor.members.extend(absorbed.members);
        for (record, count) in &absorbed.record_counts {
            survivor.bump_record_by(record, *count);
        }
        survivor.bump_records(&link.records);
        survivor.internal_connections += absorbed.internal_connections + link.count;

        debug!(
            "Merged cluster {} ({} addresses) into {} (link strength {}, now {} addresses)",
            cluster_b,
            absorbed_size,
            cluster_a,
            link.count,
            survivor.size()
        );
        Ok(true)
    }
}
