//! Configuration of a simulated ring, stored as YAML.
use std::fs;
use std::io;

use chordring_core::dht::JoinMode;
use chordring_core::dht::NetworkConfig;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::util::ensure_parent_dir;
use crate::util::expand_home;

pub const DEFAULT_CONFIG_PATH: &str = "~/.chordring/config.yaml";
pub const DEFAULT_STEPS: u64 = 100;
pub const DEFAULT_STABILIZE_INTERVAL_MS: u64 = 200;

fn default_steps() -> u64 {
    DEFAULT_STEPS
}

fn default_stabilize_interval_ms() -> u64 {
    DEFAULT_STABILIZE_INTERVAL_MS
}

/// A key/value pair stored once the ring is up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DataItem {
    pub key: String,
    pub value: String,
}

impl DataItem {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    pub network: NetworkConfig,
    /// Ring indices joined in order. The first one founds the network.
    pub peers: Vec<u64>,
    /// Driver steps run after bootstrap.
    #[serde(default = "default_steps")]
    pub steps: u64,
    /// Pause between two driver steps.
    #[serde(default)]
    pub pace_ms: u64,
    /// When there is no configuration in the YAML file,
    /// its deserialization is equivalent to `vec![]` in Rust.
    #[serde(default)]
    pub data: Vec<DataItem>,
    /// Interval of each per-peer stabilizer in timer mode.
    #[serde(default = "default_stabilize_interval_ms")]
    pub stabilize_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(NetworkConfig::new(6, JoinMode::Dynamic), vec![0, 8, 16, 32, 48])
    }
}

impl Config {
    pub fn new(network: NetworkConfig, peers: Vec<u64>) -> Self {
        Self {
            network,
            peers,
            steps: DEFAULT_STEPS,
            pace_ms: 0,
            data: vec![
                DataItem::new("alpha", "1"),
                DataItem::new("beta", "2"),
                DataItem::new("gamma", "3"),
            ],
            stabilize_interval_ms: DEFAULT_STABILIZE_INTERVAL_MS,
        }
    }

    pub fn write_fs<P>(&self, path: P) -> Result<String>
    where P: AsRef<std::path::Path> {
        let path = expand_home(path)?;
        let path = path.to_str().ok_or(Error::EncodeError)?;
        ensure_parent_dir(path)?;
        let f =
            fs::File::create(path).map_err(|e| Error::CreateFileError(format!("{}", e)))?;
        let f_writer = io::BufWriter::new(f);
        serde_yaml::to_writer(f_writer, self)?;
        Ok(path.to_string())
    }

    pub fn read_fs<P>(path: P) -> Result<Config>
    where P: AsRef<std::path::Path> {
        let path = expand_home(path)?;
        tracing::debug!("Read config from: {:?}", path);
        let f = fs::File::open(path).map_err(|e| Error::OpenFileError(e.to_string()))?;
        let f_rdr = io::BufReader::new(f);
        Ok(serde_yaml::from_reader(f_rdr)?)
    }
}
