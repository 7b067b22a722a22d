//! Chordring core: a Chord overlay over a 2^m identifier circle.
//!
//! Peers own contiguous arcs of the circle and route lookups for any
//! identifier to its owner in O(log N) hops through a per-peer finger table.
//! Cross-peer calls never touch another peer's memory: every call is a
//! [message::Message] delivered through a [message::Transport].
#![warn(missing_docs)]

pub mod consts;
pub mod dht;
pub mod error;
pub mod inspect;
pub mod message;
pub mod storage;
pub mod swarm;

#[cfg(test)]
mod tests;

pub use dht::ChordNetwork;
pub use dht::ChordPeer;
pub use dht::Identifier;
pub use error::Error;
pub use error::Result;
pub use swarm::Swarm;
