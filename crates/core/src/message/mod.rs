//! Message and MessageHandler
mod payload;
pub use payload::decode;
pub use payload::encode;
pub use payload::MessagePayload;
pub use payload::Transport;

pub mod types;
pub use types::*;

pub mod handlers;
pub use handlers::MessageHandler;

mod remote;
pub use remote::RemotePeer;
