//! The one persistent socket to the game master.

mod manager;
mod policy;
mod status;

pub use manager::ConnectionManager;
pub use policy::{DEFAULT_MAX_RECONNECT_ATTEMPTS, DEFAULT_RECONNECT_INTERVAL, ReconnectPolicy};
pub use status::{CloseReason, ConnectionEvent, ConnectionStatus};

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Socket-level failures. They are logged and fed to the reconnection
/// policy; none of them reaches a store or a consumer.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to open socket: {0}")]
    Open(#[source] tungstenite::Error),

    #[error("socket read failed: {0}")]
    Read(#[source] tungstenite::Error),

    #[error("socket write failed: {0}")]
    Write(#[source] tungstenite::Error),

    #[error("failed to encode outbound message: {0}")]
    Encode(#[from] serde_json::Error),
}
