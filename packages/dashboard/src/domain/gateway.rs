//! Outbound port used by domain stores to reach the game master.
//!
//! The domain defines the port, the infrastructure's connection manager
//! implements it.

use super::message::OutboundMessage;

/// Outcome of handing a message to the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued for writing on the socket opened as `generation`
    Written { generation: u64 },
    /// No socket was open; the message is gone
    Dropped,
}

impl Delivery {
    pub fn is_written(&self) -> bool {
        matches!(self, Delivery::Written { .. })
    }
}

/// Fire-and-forget sender toward the game master.
#[cfg_attr(test, mockall::automock)]
pub trait CommandGateway: Send + Sync {
    /// Write `message` to the open socket, or drop it when there is none.
    /// Never blocks and never retries.
    fn send(&self, message: OutboundMessage) -> Delivery;

    /// Whether the connection gave up reconnecting for good.
    fn is_failed(&self) -> bool;
}
