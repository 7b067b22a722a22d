#![warn(missing_docs)]
//! Messages exchanged between peers of a ring.
//! Every [Message] is answered by exactly one [MessageResponse].

use serde::Deserialize;
use serde::Serialize;

use crate::dht::Identifier;
use crate::dht::NodeStatus;

/// Request sent to a single peer.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub enum Message {
    /// Ask for the first finger.
    Successor,
    /// Ask for the predecessor link.
    Predecessor,
    /// Ask for the lifecycle status.
    Status,
    /// Ask for the farthest finger strictly between the peer and the target.
    ClosestPrecedingFinger(Identifier),
    /// Ask the peer to route a successor lookup on our behalf.
    FindSuccessor(Identifier),
    /// Overwrite the predecessor link.
    SetPredecessor(Option<Identifier>),
    /// The sender thinks it might be the predecessor.
    Notify(Identifier),
    /// Static join propagation.
    UpdateFingerTable {
        /// The joined peer.
        node: Identifier,
        /// One-based finger index.
        index: usize,
        /// Chained updates so far.
        hops: usize,
    },
    /// Store into the local storage without routing.
    StoreLocal {
        /// key
        key: String,
        /// value
        value: String,
    },
    /// Read from the local storage without routing.
    LookupLocal(String),
    /// Remove from the local storage without routing.
    DeleteLocal(String),
    /// Ask for every local entry.
    DumpStorage,
}

/// Answer of a [Message].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub enum MessageResponse {
    /// A peer reference, `None` when unknown.
    Node(Option<Identifier>),
    /// Lifecycle status.
    Status(NodeStatus),
    /// A stored value, `None` when not found.
    Value(Option<String>),
    /// Local entries.
    Entries(Vec<(String, String)>),
    /// Write accepted.
    Done,
    /// The peer cannot serve this request in its current status.
    Offline,
}
