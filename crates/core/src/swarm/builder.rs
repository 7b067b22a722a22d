#![warn(missing_docs)]

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use crate::dht::ChordNetwork;
use crate::dht::JoinMode;
use crate::dht::NetworkConfig;
use crate::error::Result;
use crate::swarm::MemoryTransport;
use crate::swarm::Swarm;

/// Creates a [Swarm] from a [NetworkConfig] with optional overrides.
pub struct SwarmBuilder {
    config: NetworkConfig,
}

impl SwarmBuilder {
    /// Start from `bits` and `mode` with default bounds.
    pub fn new(bits: u32, mode: JoinMode) -> Self {
        SwarmBuilder {
            config: NetworkConfig::new(bits, mode),
        }
    }

    /// Start from a full config.
    pub fn from_config(config: NetworkConfig) -> Self {
        SwarmBuilder { config }
    }

    /// Routing hop bound.
    pub fn max_hops(mut self, max_hops: usize) -> Self {
        self.config.max_hops = max_hops;
        self
    }

    /// Per call timeout.
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.config.call_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Build the swarm. Fails on an unsupported bit width.
    pub fn build(self) -> Result<Swarm> {
        let network = Arc::new(ChordNetwork::new(self.config)?);
        let transport = Arc::new(MemoryTransport::new(network.call_timeout()));
        Ok(Swarm {
            network,
            transport,
            peers: DashMap::new(),
        })
    }
}
