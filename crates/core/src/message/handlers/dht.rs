use crate::dht::Chord;
use crate::dht::ChordPeer;
use crate::dht::NodeStatus;
use crate::error::Result;
use crate::message::Message;
use crate::message::MessageResponse;

impl ChordPeer {
    /// Structural reads are served unless OFFLINE, so a JOINING peer can
    /// take part in the static join handshake. Routed lookups need ONLINE.
    pub(crate) async fn handle_dht_message(&self, msg: &Message) -> Result<MessageResponse> {
        let status = self.status()?;
        let offline = status == NodeStatus::Offline;
        let resp = match msg {
            Message::Status => MessageResponse::Status(status),
            _ if offline && !matches!(msg, Message::Notify(_)) => MessageResponse::Offline,
            Message::Successor => MessageResponse::Node(self.successor()?),
            Message::Predecessor => MessageResponse::Node(self.predecessor()?),
            Message::ClosestPrecedingFinger(id) => {
                MessageResponse::Node(self.closest_preceding_finger(*id).await?)
            }
            Message::FindSuccessor(id) => {
                if status == NodeStatus::Online {
                    MessageResponse::Node(self.find_successor(*id).await?)
                } else {
                    MessageResponse::Offline
                }
            }
            Message::SetPredecessor(node) => {
                self.set_predecessor(*node)?;
                MessageResponse::Done
            }
            Message::Notify(node) => {
                self.notify(*node).await?;
                MessageResponse::Done
            }
            Message::UpdateFingerTable { node, index, hops } => {
                self.update_finger_table(*node, *index, *hops).await?;
                MessageResponse::Done
            }
            _ => MessageResponse::Offline,
        };
        Ok(resp)
    }
}
