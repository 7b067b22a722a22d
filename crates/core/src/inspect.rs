//! Serializable snapshots of peers and rings.
#![warn(missing_docs)]
use serde::Deserialize;
use serde::Serialize;

use crate::dht::ChordPeer;
use crate::dht::NodeStatus;
use crate::storage::KvStorageInterface;
use crate::swarm::Swarm;

/// State of a single peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInspect {
    /// Ring index.
    pub id: u64,
    /// Lifecycle status.
    pub status: NodeStatus,
    /// Predecessor index.
    #[serde(default)]
    pub predecessor: Option<u64>,
    /// Fingers as `(node, start)`, one-based order.
    pub finger_table: Vec<(Option<u64>, u64)>,
    /// Number of locally stored keys.
    pub keys: u32,
}

/// State of every peer of a swarm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmInspect {
    /// Bit width of the ring.
    pub bits: u32,
    /// Peers sorted by index.
    pub peers: Vec<PeerInspect>,
}

impl PeerInspect {
    /// Take a snapshot. Lock failures show up as empty fields.
    pub async fn inspect(peer: &ChordPeer) -> Self {
        let finger_table = peer
            .lock_finger()
            .map(|finger| {
                finger
                    .list()
                    .iter()
                    .enumerate()
                    .map(|(i, node)| {
                        (
                            node.map(|n| n.index()),
                            finger.start(i + 1).unwrap_or_default(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();
        let predecessor = peer.predecessor().ok().flatten().map(|p| p.index());
        let status = peer.status().unwrap_or_default();
        let keys = peer.storage().count().await.unwrap_or_default();
        Self {
            id: peer.id().index(),
            status,
            predecessor,
            finger_table,
            keys,
        }
    }

    /// Finger nodes only.
    pub fn fingers(&self) -> Vec<Option<u64>> {
        self.finger_table.iter().map(|(n, _)| *n).collect()
    }
}

impl SwarmInspect {
    /// Take a snapshot of every peer.
    pub async fn inspect(swarm: &Swarm) -> Self {
        let mut peers = vec![];
        for peer in swarm.peers() {
            peers.push(PeerInspect::inspect(&peer).await);
        }
        Self {
            bits: swarm.network().bits(),
            peers,
        }
    }
}
