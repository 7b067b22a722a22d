//! In-process transport. Every peer of a [Swarm](super::Swarm) is reachable
//! by its identifier through a shared directory.
use std::sync::Arc;
use std::sync::Weak;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::dht::Identifier;
use crate::error::Error;
use crate::error::Result;
use crate::message::decode;
use crate::message::encode;
use crate::message::MessageHandler;
use crate::message::MessagePayload;
use crate::message::MessageResponse;
use crate::message::Transport;

/// Delivers payloads to handlers living in the same process.
///
/// Payloads and responses still cross a bincode encode/decode boundary, and
/// every call is bounded by a timeout, so peers see the same failure modes as
/// over a real network.
pub struct MemoryTransport {
    handlers: DashMap<u64, Weak<dyn MessageHandler>>,
    timeout: Duration,
}

impl MemoryTransport {
    /// Create an empty directory.
    pub fn new(timeout: Duration) -> Self {
        Self {
            handlers: DashMap::new(),
            timeout,
        }
    }

    /// Make `handler` reachable at `id`.
    pub fn register(&self, id: Identifier, handler: Weak<dyn MessageHandler>) -> Result<()> {
        if self
            .handlers
            .get(&id.index())
            .map(|h| h.strong_count() > 0)
            .unwrap_or(false)
        {
            return Err(Error::PeerAlreadyExists(id.index()));
        }
        self.handlers.insert(id.index(), handler);
        Ok(())
    }

    /// Forget `id`. Later calls to it fail with [Error::PeerNotFound].
    pub fn unregister(&self, id: Identifier) {
        self.handlers.remove(&id.index());
    }

    /// Whether `id` is reachable.
    pub fn contains(&self, id: Identifier) -> bool {
        self.handlers
            .get(&id.index())
            .map(|h| h.strong_count() > 0)
            .unwrap_or(false)
    }

    fn handler(&self, id: Identifier) -> Result<Arc<dyn MessageHandler>> {
        self.handlers
            .get(&id.index())
            .and_then(|h| h.upgrade())
            .ok_or(Error::PeerNotFound(id.index()))
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send_payload(&self, payload: MessagePayload) -> Result<MessageResponse> {
        let to = payload.to;
        let handler = self.handler(to)?;
        let data = payload.to_bytes()?;
        let call = async move {
            let payload = MessagePayload::from_bytes(&data)?;
            let resp = handler.handle_payload(&payload).await?;
            encode(&resp)
        };
        let data = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| {
                tracing::warn!("call to {} timed out", to);
                Error::RemoteCallTimeout(to.index())
            })??;
        decode(&data)
    }
}
