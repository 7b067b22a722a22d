//! Discrete-step driver of a ring hosted in one process.
//!
//! Every step picks a peer uniformly at random for each maintenance operation
//! and runs them one after another, so no two maintenance operations overlap.
//! Peers may also be driven by their own timer through [SimulationEngine::spawn_stabilizers].
use std::sync::Arc;
use std::time::Duration;

use chordring_core::dht::Chord;
use chordring_core::dht::ChordPeer;
use chordring_core::dht::ChordStorage;
use chordring_core::dht::NetworkConfig;
use chordring_core::dht::NodeStatus;
use chordring_core::dht::Stabilization;
use chordring_core::dht::Stabilizer;
use chordring_core::inspect::SwarmInspect;
use chordring_core::swarm::SwarmBuilder;
use chordring_core::Swarm;

use crate::error::Error;
use crate::error::Result;

pub struct SimulationEngine {
    swarm: Swarm,
    steps: u64,
}

impl SimulationEngine {
    pub fn new(config: NetworkConfig) -> Result<Self> {
        Ok(Self {
            swarm: SwarmBuilder::from_config(config).build()?,
            steps: 0,
        })
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    /// Steps run so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Join every index in order. The first one founds the ring.
    pub async fn init_network(&self, indices: &[u64]) -> Result<()> {
        for index in indices {
            self.node_joining(*index).await?;
        }
        Ok(())
    }

    fn random_online(&self) -> Option<Arc<ChordPeer>> {
        self.swarm.random_peer(Some(NodeStatus::Online))
    }

    /// Create a peer at `index` and join it through a random ONLINE member.
    /// With no member around, the peer founds the ring.
    pub async fn node_joining(&self, index: u64) -> Result<Arc<ChordPeer>> {
        let via = self.random_online().map(|p| p.id());
        let peer = match self.swarm.peer(index) {
            Some(peer) => peer,
            None => self.swarm.create_peer(index)?,
        };
        tracing::info!("node {} joining via {:?}", index, via);
        peer.join(via).await?;
        Ok(peer)
    }

    /// The peer at `index` leaves. Its keys are lost.
    pub async fn node_leaving(&self, index: u64) -> Result<()> {
        if self.swarm.peer(index).is_none() {
            return Err(Error::UnknownPeer(index));
        }
        tracing::info!("node {} leaving", index);
        Ok(self.swarm.remove(index).await?)
    }

    /// Store through a random ONLINE peer.
    pub async fn store_data(&self, key: &str, value: &str) -> Result<()> {
        let peer = self.random_online().ok_or(Error::EmptyRing)?;
        tracing::debug!("store {} through {}", key, peer.id());
        Ok(peer.store(None, key, value).await?)
    }

    /// Look up through a random ONLINE peer.
    pub async fn lookup_data(&self, key: &str) -> Result<Option<String>> {
        let peer = self.random_online().ok_or(Error::EmptyRing)?;
        tracing::debug!("lookup {} through {}", key, peer.id());
        Ok(peer.lookup(None, key).await?)
    }

    /// One driver step. Maintenance only happens in dynamic mode.
    pub async fn next(&mut self) -> Result<()> {
        self.steps += 1;
        if !self.swarm.network().is_dynamic() {
            return Ok(());
        }
        if let Some(peer) = self.swarm.random_peer(None) {
            peer.stabilize()
                .await
                .unwrap_or_else(|e| tracing::error!("step {} stabilize: {:?}", self.steps, e));
        }
        if let Some(peer) = self.swarm.random_peer(None) {
            peer.fix_fingers()
                .await
                .unwrap_or_else(|e| tracing::error!("step {} fix_fingers: {:?}", self.steps, e));
        }
        if let Some(peer) = self.swarm.random_peer(None) {
            peer.check_predecessor().await.unwrap_or_else(|e| {
                tracing::error!("step {} check_predecessor: {:?}", self.steps, e)
            });
        }
        if let Some(peer) = self.swarm.random_peer(None) {
            peer.check_successor().await.unwrap_or_else(|e| {
                tracing::error!("step {} check_successor: {:?}", self.steps, e)
            });
        }
        Ok(())
    }

    /// Run `steps` steps, sleeping `pace` between two of them.
    pub async fn run(&mut self, steps: u64, pace: Duration) -> Result<()> {
        for _ in 0..steps {
            self.next().await?;
            if !pace.is_zero() {
                tokio::time::sleep(pace).await;
            }
        }
        Ok(())
    }

    /// Give every peer its own stabilization timer.
    pub fn spawn_stabilizers(&self, interval: Duration) -> Vec<tokio::task::JoinHandle<()>> {
        self.swarm
            .peers()
            .into_iter()
            .map(|peer| {
                let stabilizer = Arc::new(Stabilizer::new(peer));
                tokio::spawn(stabilizer.wait(interval))
            })
            .collect()
    }

    pub async fn inspect(&self) -> SwarmInspect {
        self.swarm.inspect().await
    }
}
