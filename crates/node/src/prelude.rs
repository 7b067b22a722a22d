//! A prelude is provided which imports all the important data types and traits of chordring.
/// Use this when you want to quickly bootstrap a new ring.
pub use chordring_core;

pub use self::chordring_core::dht::Chord;
pub use self::chordring_core::dht::ChordPeer;
pub use self::chordring_core::dht::ChordStorage;
pub use self::chordring_core::dht::JoinMode;
pub use self::chordring_core::dht::NetworkConfig;
pub use self::chordring_core::dht::NodeStatus;
pub use self::chordring_core::dht::Stabilization;
pub use self::chordring_core::dht::Stabilizer;
pub use self::chordring_core::inspect::PeerInspect;
pub use self::chordring_core::inspect::SwarmInspect;
pub use self::chordring_core::swarm::Swarm;
pub use self::chordring_core::swarm::SwarmBuilder;
pub use crate::simulation::SimulationEngine;
