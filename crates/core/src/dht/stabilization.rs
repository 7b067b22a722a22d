//! Stabilization run daemons to maintain dht.

use std::sync::Arc;

use crate::dht::ChordPeer;
use crate::dht::Stabilization;
use crate::error::Result;

/// The stabilization runner of a single peer.
#[derive(Clone)]
pub struct Stabilizer {
    peer: Arc<ChordPeer>,
}

impl Stabilizer {
    /// Create a new stabilization runner.
    pub fn new(peer: Arc<ChordPeer>) -> Self {
        Self { peer }
    }

    /// Run stabilization once. Failures are logged, never propagated,
    /// the next round simply tries again.
    pub async fn stabilize(&self) -> Result<()> {
        tracing::debug!("STABILIZATION stabilize start");
        if let Err(e) = self.peer.stabilize().await {
            tracing::error!("[stabilize] Failed on stabilize {:?}", e);
        }
        tracing::debug!("STABILIZATION fix_fingers start");
        if let Err(e) = self.peer.fix_fingers().await {
            tracing::error!("[stabilize] Failed on fix_finger {:?}", e);
        }
        tracing::debug!("STABILIZATION check_predecessor start");
        if let Err(e) = self.peer.check_predecessor().await {
            tracing::error!("[stabilize] Failed on check predecessor {:?}", e);
        }
        tracing::debug!("STABILIZATION check_successor start");
        if let Err(e) = self.peer.check_successor().await {
            tracing::error!("[stabilize] Failed on check successor {:?}", e);
        }
        tracing::debug!("STABILIZATION end");
        Ok(())
    }
}

mod stabilizer {
    use std::sync::Arc;
    use std::time::Duration;

    use futures::future::FutureExt;
    use futures::pin_mut;
    use futures::select;
    use futures_timer::Delay;

    use super::*;

    impl Stabilizer {
        /// Run stabilization in a loop.
        pub async fn wait(self: Arc<Self>, interval: Duration) {
            loop {
                let timeout = Delay::new(interval).fuse();
                pin_mut!(timeout);
                select! {
                    _ = timeout => self
                        .stabilize()
                        .await
                        .unwrap_or_else(|e| tracing::error!("failed to stabilize {:?}", e)),
                }
            }
        }
    }
}
