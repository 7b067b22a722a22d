//! Shared configuration of a ring.
use serde::Deserialize;
use serde::Serialize;

use super::hash::HashFunction;
use super::identifier::Identifier;
use super::identifier::IdentifierCircle;
use super::types::JoinMode;
use crate::consts::DEFAULT_CALL_TIMEOUT_MS;
use crate::consts::DEFAULT_MAX_HOPS;
use crate::error::Result;

fn default_max_hops() -> usize {
    DEFAULT_MAX_HOPS
}

fn default_call_timeout_ms() -> u64 {
    DEFAULT_CALL_TIMEOUT_MS
}

/// Serializable settings of a ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Bit width m, the ring holds 2^m identifiers.
    pub bits: u32,
    /// Join discipline of every peer.
    #[serde(default)]
    pub mode: JoinMode,
    /// Upper bound of routing iterations and chained finger updates.
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,
    /// Timeout of a single remote call.
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
}

impl NetworkConfig {
    /// Config with default hop bound and timeout.
    pub fn new(bits: u32, mode: JoinMode) -> Self {
        Self {
            bits,
            mode,
            max_hops: DEFAULT_MAX_HOPS,
            call_timeout_ms: DEFAULT_CALL_TIMEOUT_MS,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::new(6, JoinMode::Dynamic)
    }
}

/// Shared by every peer of a ring. Holds nothing but configuration.
#[derive(Debug, Clone)]
pub struct ChordNetwork {
    config: NetworkConfig,
    hash: HashFunction,
    circle: IdentifierCircle,
}

impl ChordNetwork {
    /// Precompute the identifier circle for `config.bits`.
    pub fn new(config: NetworkConfig) -> Result<Self> {
        let circle = IdentifierCircle::new(config.bits)?;
        Ok(Self {
            hash: HashFunction::new(config.bits),
            circle,
            config,
        })
    }

    /// Bit width m.
    pub fn bits(&self) -> u32 {
        self.config.bits
    }

    /// Ring size 2^m.
    pub fn size(&self) -> u64 {
        self.circle.size()
    }

    /// Join discipline.
    pub fn mode(&self) -> JoinMode {
        self.config.mode
    }

    /// True in dynamic mode.
    pub fn is_dynamic(&self) -> bool {
        self.config.mode == JoinMode::Dynamic
    }

    /// Hash function of the ring.
    pub fn hash_function(&self) -> &HashFunction {
        &self.hash
    }

    /// All identifiers of the ring.
    pub fn circle(&self) -> &IdentifierCircle {
        &self.circle
    }

    /// Routing bound.
    pub fn max_hops(&self) -> usize {
        self.config.max_hops
    }

    /// Remote call timeout.
    pub fn call_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.config.call_timeout_ms)
    }

    /// Serializable config.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Identifier a key maps to.
    pub fn key_identifier(&self, key: &str) -> Identifier {
        self.circle.at(self.hash.hash(key) as i64)
    }
}
