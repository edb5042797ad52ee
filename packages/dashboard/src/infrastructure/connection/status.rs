//! Observable connection status and the event feed of the connection task.

use chrono::{DateTime, Utc};
use std::fmt;

use super::ConnectionError;
use crate::domain::InboundMessage;

/// Connection status as seen by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// First connection attempt in progress
    Connecting,
    /// A socket is open; `generation` counts opens since start
    Open {
        generation: u64,
        since: DateTime<Utc>,
    },
    /// Waiting for, or performing, reconnect attempt number `attempt`
    Reconnecting { attempt: u32 },
    /// Reconnect budget exhausted; the connection will not come back
    Failed,
    /// Shut down on request
    Closed,
}

impl ConnectionStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionStatus::Open { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ConnectionStatus::Failed)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connecting => write!(f, "connecting"),
            ConnectionStatus::Open { generation, since } => {
                write!(f, "open (socket #{generation} since {})", since.format("%H:%M:%S"))
            }
            ConnectionStatus::Reconnecting { attempt } => write!(f, "reconnecting (attempt {attempt})"),
            ConnectionStatus::Failed => write!(f, "failed"),
            ConnectionStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Why a socket stopped.
#[derive(Debug)]
pub enum CloseReason {
    /// The server closed the socket or the stream ended
    ServerClosed,
    /// Read or write failed
    Lost(ConnectionError),
    /// `shutdown` was requested
    Shutdown,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::ServerClosed => write!(f, "closed by server"),
            CloseReason::Lost(e) => write!(f, "{e}"),
            CloseReason::Shutdown => write!(f, "shut down"),
        }
    }
}

/// Events emitted by the connection task, in socket order.
#[derive(Debug)]
pub enum ConnectionEvent {
    Opened { generation: u64 },
    Message(InboundMessage),
    Closed { generation: u64, reason: CloseReason },
    Failed { attempts: u32 },
}
