use crate::connection::peer_link::PeerLink;
use dashmap::DashMap;
use std::sync::Arc;
use trellis_core::PeerId;

/// Session-scoped map of peer id to live connection. One entry per remote
/// participant; owned by the session's manager, never a process-wide
/// singleton.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    links: Arc<DashMap<PeerId, Arc<PeerLink>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            links: Arc::new(DashMap::new()),
        }
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.links.contains_key(peer_id)
    }

    pub fn insert(&self, link: Arc<PeerLink>) {
        self.links.insert(link.peer_id.clone(), link);
    }

    pub fn get(&self, peer_id: &PeerId) -> Option<Arc<PeerLink>> {
        self.links.get(peer_id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, peer_id: &PeerId) -> Option<Arc<PeerLink>> {
        self.links.remove(peer_id).map(|(_, link)| link)
    }

    /// Key-set snapshot; traversal stays valid when a peer leaves while
    /// the caller is still iterating.
    pub fn peer_ids(&self) -> Vec<PeerId> {
        self.links.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
