#![warn(missing_docs)]
//! This module implemented message handler of a chord peer.

use async_trait::async_trait;

use super::Message;
use super::MessagePayload;
use super::MessageResponse;
use crate::dht::ChordPeer;
use crate::error::Result;

/// Operator and Handler for routing and ring maintenance
pub mod dht;
/// Operator and Handler for Storage
pub mod storage;

/// Anything able to answer a [MessagePayload], inspired by Actor-Model.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Answer a single payload.
    async fn handle_payload(&self, payload: &MessagePayload) -> Result<MessageResponse>;
}

#[async_trait]
impl MessageHandler for ChordPeer {
    async fn handle_payload(&self, payload: &MessagePayload) -> Result<MessageResponse> {
        tracing::debug!(
            "{} handle {:?} from {}",
            payload.to,
            payload.message,
            payload.from
        );
        match &payload.message {
            Message::StoreLocal { .. }
            | Message::LookupLocal(_)
            | Message::DeleteLocal(_)
            | Message::DumpStorage => self.handle_storage_message(&payload.message).await,
            _ => self.handle_dht_message(&payload.message).await,
        }
    }
}
