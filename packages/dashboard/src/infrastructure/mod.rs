//! Infrastructure layer: network plumbing behind the domain's ports.

pub mod connection;

pub use connection::{
    CloseReason, ConnectionError, ConnectionEvent, ConnectionManager, ConnectionStatus,
    ReconnectPolicy,
};
