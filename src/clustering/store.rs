// src/clustering/store.rs

use std::collections::HashMap;

use crate::clustering::cluster::{Address, Cluster, ClusterId};
use crate::error::{ClusterError, Result};

/// Direct-indexed cluster storage plus the address -> cluster index.
///
/// Slots are never reused: once a cluster is retired its slot stays `None`
/// and every later lookup of that id fails with `NotFound`.
#[derive(Debug, Default, Clone)]
pub struct ClusterStore {
    slots: Vec<Option<Cluster>>,
    membership: HashMap<Address, ClusterId>,
    live: usize,
}

impl ClusterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cluster with a fresh id and registers its members.
    pub fn allocate<I>(&mut self, members: I, internal_connections: u64) -> ClusterId
    where
        I: IntoIterator<Item = Address>,
    {
        let id = ClusterId(self.slots.len());
        let cluster = Cluster::new(id, members, internal_connections);
        for member in &cluster.members {
            self.membership.insert(member.clone(), id);
        }
        self.slots.push(Some(cluster));
        self.live += 1;
        id
    }

    pub fn get(&self, id: ClusterId) -> Result<&Cluster> {
        self.slots
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(ClusterError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: ClusterId) -> Result<&mut Cluster> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(ClusterError::NotFound(id))
    }

    pub fn is_live(&self, id: ClusterId) -> bool {
        matches!(self.slots.get(id.index()), Some(Some(_)))
    }

    pub fn cluster_of(&self, address: &str) -> Option<ClusterId> {
        self.membership.get(address).copied()
    }

    pub fn add_member(&mut self, id: ClusterId, address: &str) -> Result<()> {
        let cluster = self.get_mut(id)?;
        cluster.members.insert(address.to_string());
        self.membership.insert(address.to_string(), id);
        Ok(())
    }

    pub fn bump_record(&mut self, id: ClusterId, record: &str) -> Result<()> {
        self.get_mut(id)?.bump_record(record);
        Ok(())
    }

    pub fn bump_internal_connections(&mut self, id: ClusterId, n: u64) -> Result<()> {
        self.get_mut(id)?.internal_connections += n;
        Ok(())
    }

    /// Moves every member of `from` onto `to` in the address index.
    pub fn repoint_members(&mut self, from: &Cluster, to: ClusterId) {
        for member in &from.members {
            self.membership.insert(member.clone(), to);
        }
    }

    /// Removes a live cluster. Its id is invalid from here on.
    pub fn retire(&mut self, id: ClusterId) -> Result<Cluster> {
        let cluster = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(ClusterError::NotFound(id))?;
        self.live -= 1;
        Ok(cluster)
    }

    pub fn live(&self) -> impl Iterator<Item = &Cluster> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Total ids ever handed out, retired ones included.
    pub fn allocated_count(&self) -> usize {
        self.slots.len()
    }

    pub fn address_count(&self) -> usize {
        self.membership.len()
    }

    pub(crate) fn membership(&self) -> &HashMap<Address, ClusterId> {
        &self.membership
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.membership.clear();
        self.live = 0;
    }
}
