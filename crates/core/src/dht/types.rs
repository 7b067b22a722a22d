//! DHT types about `Chord`, `Stabilization` and `ChordStorage`.
#![warn(missing_docs)]
use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use super::identifier::Identifier;
use crate::error::Result;

/// Lifecycle of a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// Created but not joined, or left.
    #[default]
    Offline,
    /// Join in progress. In dynamic mode a peer stays here until its first stabilize.
    Joining,
    /// Member of the ring.
    Online,
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offline => write!(f, "OFFLINE"),
            Self::Joining => write!(f, "JOINING"),
            Self::Online => write!(f, "ONLINE"),
        }
    }
}

/// How peers enter the ring. Selected once for the whole network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinMode {
    /// Full finger table setup and propagation at join time, no repair afterwards.
    Static,
    /// Minimal join, the ring is repaired by periodic stabilization.
    #[default]
    Dynamic,
}

/// Chord is a distributed hash table (DHT) algorithm that is designed to efficiently
/// distribute data across peer-to-peer network nodes. You may want to browse its
/// [wiki](https://en.wikipedia.org/wiki/Chord_(peer-to-peer)) before you read this.
///
/// Peers are addressed by [Identifier]. `None` in any answer means the peer asked
/// could not answer, usually because it is offline, and callers treat it as a
/// failed hop.
#[async_trait]
pub trait Chord {
    /// Ask the ring for the peer owning `id`.
    async fn find_successor(&self, id: Identifier) -> Result<Option<Identifier>>;

    /// Ask the ring for the peer whose arc ends right before `id`.
    async fn find_predecessor(&self, id: Identifier) -> Result<Option<Identifier>>;

    /// Farthest finger of this peer lying strictly between itself and `id`.
    async fn closest_preceding_finger(&self, id: Identifier) -> Result<Option<Identifier>>;

    /// Join the ring through `via`, or found a new ring when `via` is `None`.
    async fn join(&self, via: Option<Identifier>) -> Result<()>;

    /// Go offline. Stored data is not handed over.
    async fn leave(&self) -> Result<()>;

    /// `node` thinks it might be our predecessor.
    async fn notify(&self, node: Identifier) -> Result<()>;

    /// If `node` should be the `index`-th finger, record it and propagate to
    /// the predecessor. `hops` counts chained updates so far.
    async fn update_finger_table(&self, node: Identifier, index: usize, hops: usize)
        -> Result<()>;
}

/// Periodic maintenance of the ring, only meaningful in dynamic mode.
#[async_trait]
pub trait Stabilization: Chord {
    /// Verify the successor and tell it about us.
    async fn stabilize(&self) -> Result<()>;

    /// Refresh one random finger in `[2, m]`.
    async fn fix_fingers(&self) -> Result<()>;

    /// Drop a predecessor that went offline.
    async fn check_predecessor(&self) -> Result<()>;

    /// Replace a missing or offline successor.
    async fn check_successor(&self) -> Result<()>;
}

/// Key value storage routed over the ring. A key lives on exactly one peer,
/// the successor of the key's identifier.
#[async_trait]
pub trait ChordStorage: Chord {
    /// Route to the owner and store, overwriting any previous value.
    /// `origin` is the peer that issued the request, if any.
    async fn store(&self, origin: Option<Identifier>, key: &str, value: &str) -> Result<()>;

    /// Route to the owner and read.
    async fn lookup(&self, origin: Option<Identifier>, key: &str) -> Result<Option<String>>;

    /// Route to the owner and remove, returning the previous value.
    async fn delete(&self, origin: Option<Identifier>, key: &str) -> Result<Option<String>>;

    /// Keys held locally, no routing.
    async fn keys(&self) -> Result<BTreeSet<String>>;
}
