use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use super::Message;
use super::MessageResponse;
use crate::dht::Identifier;
use crate::error::Error;
use crate::error::Result;

/// Serialize by [bincode::serialize].
pub fn encode<T>(data: &T) -> Result<Vec<u8>>
where T: Serialize {
    bincode::serialize(data).map_err(Error::BincodeSerialize)
}

/// Deserialize by [bincode::deserialize].
pub fn decode<T>(data: &[u8]) -> Result<T>
where T: DeserializeOwned {
    bincode::deserialize(data).map_err(Error::BincodeDeserialize)
}

/// `MessagePayload` is used to transmit a [Message] between peers.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct MessagePayload {
    /// Sender.
    pub from: Identifier,
    /// Destination.
    pub to: Identifier,
    /// The request.
    pub message: Message,
}

impl MessagePayload {
    /// Wrap a message.
    pub fn new(from: Identifier, to: Identifier, message: Message) -> Self {
        Self { from, to, message }
    }

    /// Encode for the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode(self)
    }

    /// Decode from the wire.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        decode(data)
    }
}

/// Delivers payloads to peers and brings back their answer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver `payload` to `payload.to`. Fails with
    /// [Error::PeerNotFound] for unknown peers and
    /// [Error::RemoteCallTimeout] when no answer arrives in time.
    async fn send_payload(&self, payload: MessagePayload) -> Result<MessageResponse>;

    /// Alias of `send_payload` building the payload.
    async fn send_message(
        &self,
        from: Identifier,
        to: Identifier,
        message: Message,
    ) -> Result<MessageResponse> {
        self.send_payload(MessagePayload::new(from, to, message))
            .await
    }
}
