#![warn(missing_docs)]
//! The swarm owns every peer of a ring living in this process, together with
//! the shared configuration and the transport connecting them.
mod builder;
mod transport;

use std::sync::Arc;

pub use builder::SwarmBuilder;
use dashmap::DashMap;
use rand::seq::SliceRandom;
pub use transport::MemoryTransport;

use crate::dht::Chord;
use crate::dht::ChordNetwork;
use crate::dht::ChordPeer;
use crate::dht::NodeStatus;
use crate::error::Error;
use crate::error::Result;
use crate::inspect::SwarmInspect;
use crate::message::MessageHandler;

/// All peers of a ring hosted in one process.
pub struct Swarm {
    pub(crate) network: Arc<ChordNetwork>,
    pub(crate) transport: Arc<MemoryTransport>,
    pub(crate) peers: DashMap<u64, Arc<ChordPeer>>,
}

impl Swarm {
    /// Shared configuration.
    pub fn network(&self) -> Arc<ChordNetwork> {
        self.network.clone()
    }

    /// Transport connecting the peers.
    pub fn transport(&self) -> Arc<MemoryTransport> {
        self.transport.clone()
    }

    /// Create an OFFLINE peer at ring position `index` and make it reachable.
    pub fn create_peer(&self, index: u64) -> Result<Arc<ChordPeer>> {
        let id = self.network.circle().get(index)?;
        if self.peers.contains_key(&index) {
            return Err(Error::PeerAlreadyExists(index));
        }
        let peer = Arc::new(ChordPeer::new(
            id,
            self.network.clone(),
            self.transport.clone(),
        ));
        let handler: Arc<dyn MessageHandler> = peer.clone();
        self.transport.register(id, Arc::downgrade(&handler))?;
        self.peers.insert(index, peer.clone());
        tracing::debug!("swarm created peer {}", id);
        Ok(peer)
    }

    /// Peer at `index`.
    pub fn peer(&self, index: u64) -> Option<Arc<ChordPeer>> {
        self.peers.get(&index).map(|p| p.value().clone())
    }

    /// Every peer sorted by index.
    pub fn peers(&self) -> Vec<Arc<ChordPeer>> {
        let mut peers: Vec<_> = self.peers.iter().map(|p| p.value().clone()).collect();
        peers.sort_by_key(|p| p.id());
        peers
    }

    /// Peers in `status`, sorted by index.
    pub fn peers_in(&self, status: NodeStatus) -> Vec<Arc<ChordPeer>> {
        self.peers()
            .into_iter()
            .filter(|p| p.status().map(|s| s == status).unwrap_or(false))
            .collect()
    }

    /// A uniformly chosen peer, among those in `status` when given.
    pub fn random_peer(&self, status: Option<NodeStatus>) -> Option<Arc<ChordPeer>> {
        let candidates = match status {
            Some(status) => self.peers_in(status),
            None => self.peers(),
        };
        candidates.choose(&mut rand::thread_rng()).cloned()
    }

    /// Let the peer at `index` leave. It stays reachable and answers as OFFLINE.
    pub async fn remove(&self, index: u64) -> Result<()> {
        let peer = self
            .peer(index)
            .ok_or(Error::PeerNotFound(index))?;
        peer.leave().await
    }

    /// Snapshot of the whole ring.
    pub async fn inspect(&self) -> SwarmInspect {
        SwarmInspect::inspect(self).await
    }
}
