use crate::dht::ChordPeer;
use crate::dht::NodeStatus;
use crate::error::Result;
use crate::message::Message;
use crate::message::MessageResponse;
use crate::storage::KvStorageInterface;

impl ChordPeer {
    /// Local storage access on behalf of a routed request. No routing happens here.
    pub(crate) async fn handle_storage_message(&self, msg: &Message) -> Result<MessageResponse> {
        if self.status()? == NodeStatus::Offline {
            return Ok(MessageResponse::Offline);
        }
        let storage = self.storage();
        let resp = match msg {
            Message::StoreLocal { key, value } => {
                tracing::debug!("{} store {}", self.id(), key);
                storage.put(key, value).await?;
                MessageResponse::Done
            }
            Message::LookupLocal(key) => MessageResponse::Value(storage.get(key).await?),
            Message::DeleteLocal(key) => MessageResponse::Value(storage.remove(key).await?),
            Message::DumpStorage => MessageResponse::Entries(storage.get_all().await?),
            _ => MessageResponse::Offline,
        };
        Ok(resp)
    }
}
