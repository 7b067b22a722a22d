//! Typed client of a single remote peer.
use std::sync::Arc;

use super::Message;
use super::MessageResponse;
use super::Transport;
use crate::dht::Identifier;
use crate::dht::NodeStatus;
use crate::error::Error;
use crate::error::Result;

/// Calls to one peer through a [Transport].
///
/// Reads answered with [MessageResponse::Offline] become `None`, writes
/// answered that way fail with [Error::PeerOffline].
#[derive(Clone)]
pub struct RemotePeer {
    from: Identifier,
    to: Identifier,
    transport: Arc<dyn Transport>,
}

impl RemotePeer {
    /// Client of `to` acting on behalf of `from`.
    pub fn new(from: Identifier, to: Identifier, transport: Arc<dyn Transport>) -> Self {
        Self {
            from,
            to,
            transport,
        }
    }

    /// Target peer.
    pub fn id(&self) -> Identifier {
        self.to
    }

    async fn call(&self, message: Message) -> Result<MessageResponse> {
        self.transport
            .send_message(self.from, self.to, message)
            .await
    }

    fn unexpected(&self, resp: MessageResponse) -> Error {
        Error::UnexpectedResponse(self.to.index(), format!("{:?}", resp))
    }

    async fn read_node(&self, message: Message) -> Result<Option<Identifier>> {
        match self.call(message).await? {
            MessageResponse::Node(node) => Ok(node),
            MessageResponse::Offline => Ok(None),
            resp => Err(self.unexpected(resp)),
        }
    }

    async fn read_value(&self, message: Message) -> Result<Option<String>> {
        match self.call(message).await? {
            MessageResponse::Value(value) => Ok(value),
            MessageResponse::Offline => Ok(None),
            resp => Err(self.unexpected(resp)),
        }
    }

    async fn write(&self, message: Message) -> Result<()> {
        match self.call(message).await? {
            MessageResponse::Done => Ok(()),
            MessageResponse::Offline => Err(Error::PeerOffline(self.to.index())),
            resp => Err(self.unexpected(resp)),
        }
    }

    /// First finger of the peer.
    pub async fn successor(&self) -> Result<Option<Identifier>> {
        self.read_node(Message::Successor).await
    }

    /// Predecessor link of the peer.
    pub async fn predecessor(&self) -> Result<Option<Identifier>> {
        self.read_node(Message::Predecessor).await
    }

    /// Lifecycle status of the peer.
    pub async fn status(&self) -> Result<NodeStatus> {
        match self.call(Message::Status).await? {
            MessageResponse::Status(status) => Ok(status),
            resp => Err(self.unexpected(resp)),
        }
    }

    /// Closest preceding finger of `id` known by the peer.
    pub async fn closest_preceding_finger(&self, id: Identifier) -> Result<Option<Identifier>> {
        self.read_node(Message::ClosestPrecedingFinger(id)).await
    }

    /// Let the peer route a successor lookup.
    pub async fn find_successor(&self, id: Identifier) -> Result<Option<Identifier>> {
        self.read_node(Message::FindSuccessor(id)).await
    }

    /// Overwrite the predecessor link of the peer.
    pub async fn set_predecessor(&self, node: Option<Identifier>) -> Result<()> {
        self.write(Message::SetPredecessor(node)).await
    }

    /// Tell the peer we might be its predecessor.
    pub async fn notify(&self, node: Identifier) -> Result<()> {
        self.write(Message::Notify(node)).await
    }

    /// Static join propagation.
    pub async fn update_finger_table(
        &self,
        node: Identifier,
        index: usize,
        hops: usize,
    ) -> Result<()> {
        self.write(Message::UpdateFingerTable { node, index, hops })
            .await
    }

    /// Store into the peer's local storage.
    pub async fn store_local(&self, key: &str, value: &str) -> Result<()> {
        self.write(Message::StoreLocal {
            key: key.to_string(),
            value: value.to_string(),
        })
        .await
    }

    /// Read from the peer's local storage.
    pub async fn lookup_local(&self, key: &str) -> Result<Option<String>> {
        self.read_value(Message::LookupLocal(key.to_string()))
            .await
    }

    /// Remove from the peer's local storage.
    pub async fn delete_local(&self, key: &str) -> Result<Option<String>> {
        match self.call(Message::DeleteLocal(key.to_string())).await? {
            MessageResponse::Value(value) => Ok(value),
            MessageResponse::Offline => Err(Error::PeerOffline(self.to.index())),
            resp => Err(self.unexpected(resp)),
        }
    }

    /// Every entry of the peer's local storage.
    pub async fn dump(&self) -> Result<Vec<(String, String)>> {
        match self.call(Message::DumpStorage).await? {
            MessageResponse::Entries(entries) => Ok(entries),
            MessageResponse::Offline => Err(Error::PeerOffline(self.to.index())),
            resp => Err(self.unexpected(resp)),
        }
    }
}
