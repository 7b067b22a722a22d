//! Error of chordring_core

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors collections in chordring-core.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Finger index {0} out of range [1, {1}]")]
    FingerIndexOutOfRange(usize, usize),

    #[error("Identifier index {0} out of range [0, {1})")]
    IdentifierIndexOutOfRange(u64, u64),

    #[error("Bit width {0} is not supported, expect 1..={1}")]
    UnsupportedBitWidth(u32, u32),

    #[error("Failed on lock dht state")]
    DHTSyncLockError,

    #[error("Peer {0} is not registered in directory")]
    PeerNotFound(u64),

    #[error("Peer {0} is already registered in directory")]
    PeerAlreadyExists(u64),

    #[error("Remote call to peer {0} timed out")]
    RemoteCallTimeout(u64),

    #[error("Peer {0} is offline")]
    PeerOffline(u64),

    #[error("Unexpected response from peer {0}: {1}")]
    UnexpectedResponse(u64, String),

    #[error("Routing towards {0} exceeded {1} hops")]
    RoutingHopLimit(u64, usize),

    #[error("Routing towards {0} made no progress at peer {1}")]
    RoutingStalled(u64, u64),

    #[error("Routing towards {0} aborted at an unavailable peer")]
    RoutingAborted(u64),

    #[error("Join through peer {0} failed: {1}")]
    JoinFailed(u64, String),

    #[error("Peer {0} has already joined a network")]
    PeerAlreadyJoined(u64),

    #[error("No reachable owner for key {0}")]
    NoOwner(String),

    #[error("Bincode serialization error")]
    BincodeSerialize(#[source] bincode::Error),

    #[error("Bincode deserialization error")]
    BincodeDeserialize(#[source] bincode::Error),
}
