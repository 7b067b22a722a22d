#![warn(missing_docs)]
//! Implementation of the Chord DHT,
//! ref: <https://pdos.csail.mit.edu/papers/ton:chord/paper-ton.pdf>
//! With high probability, the number of peers that must be contacted to find a successor in an N-peer network is O(log N).

/// Finger table of a peer
pub mod finger;
pub mod hash;
pub mod identifier;
pub mod interval;
pub mod network;
mod peer;
mod stabilization;
pub mod types;

pub use finger::FingerTable;
pub use hash::HashFunction;
pub use identifier::Identifier;
pub use identifier::IdentifierCircle;
pub use interval::CircularInterval;
pub use network::ChordNetwork;
pub use network::NetworkConfig;
pub use peer::ChordPeer;
pub use stabilization::Stabilizer;
pub use types::Chord;
pub use types::ChordStorage;
pub use types::JoinMode;
pub use types::NodeStatus;
pub use types::Stabilization;
