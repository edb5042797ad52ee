//! Connection manager: owns the socket, reconnects on failure, writes
//! outbound envelopes and feeds inbound ones to the session.
//!
//! The socket lives inside a background task. The only way to write to it
//! is [`ConnectionManager::send`] (or the [`CommandGateway`] handed to
//! stores), which pushes onto a channel bound to the socket that is open at
//! that moment. When no socket is open the message is dropped, so nothing
//! written while disconnected ever reaches a later socket.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use futures_util::{SinkExt, StreamExt};
use serenity_shared::time::{elapsed_millis, now_utc};
use tokio::{
    net::TcpStream,
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::Message,
};

use super::{
    ConnectionError, ReconnectPolicy,
    status::{CloseReason, ConnectionEvent, ConnectionStatus},
};
use crate::domain::{CommandGateway, Delivery, InboundMessage, OutboundMessage};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Time given to the connection task to close the socket on shutdown.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Writer side of the socket that is currently open
struct OpenSocket {
    generation: u64,
    outbound: mpsc::UnboundedSender<String>,
}

/// State shared between the manager handle and the connection task.
struct SocketLink {
    socket: Mutex<Option<OpenSocket>>,
    status: watch::Sender<ConnectionStatus>,
}

impl SocketLink {
    fn new() -> Self {
        let (status, _) = watch::channel(ConnectionStatus::Connecting);
        Self {
            socket: Mutex::new(None),
            status,
        }
    }

    fn install(&self, generation: u64, outbound: mpsc::UnboundedSender<String>) {
        *self.socket.lock().unwrap_or_else(PoisonError::into_inner) = Some(OpenSocket {
            generation,
            outbound,
        });
        self.status.send_replace(ConnectionStatus::Open {
            generation,
            since: now_utc(),
        });
    }

    fn uninstall(&self) {
        self.socket
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn set_status(&self, status: ConnectionStatus) {
        self.status.send_replace(status);
    }
}

impl CommandGateway for SocketLink {
    fn send(&self, message: OutboundMessage) -> Delivery {
        let text = match serde_json::to_string(&message) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("{}", ConnectionError::Encode(e));
                return Delivery::Dropped;
            }
        };

        let socket = self.socket.lock().unwrap_or_else(PoisonError::into_inner);
        match socket.as_ref() {
            Some(open) if open.outbound.send(text).is_ok() => Delivery::Written {
                generation: open.generation,
            },
            _ => {
                tracing::debug!(
                    "No open socket, dropping {} `{}` for {}",
                    if message.is_init() { "handshake" } else { "command" },
                    message.kind,
                    message.concerns
                );
                Delivery::Dropped
            }
        }
    }

    fn is_failed(&self) -> bool {
        self.status.borrow().is_failed()
    }
}

/// Owner of the persistent connection to the game master.
///
/// Dropping the manager aborts the connection task; [`shutdown`] closes the
/// socket gracefully first.
///
/// [`shutdown`]: ConnectionManager::shutdown
pub struct ConnectionManager {
    link: Arc<SocketLink>,
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl ConnectionManager {
    /// Start connecting to `url` in the background.
    ///
    /// Returns the manager and the feed of connection events. The feed ends
    /// after `ConnectionEvent::Failed` or after shutdown.
    pub fn connect(
        url: impl Into<String>,
        policy: ReconnectPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<ConnectionEvent>) {
        let url = url.into();
        let link = Arc::new(SocketLink::new());
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(run_connection(
            url,
            policy,
            Arc::clone(&link),
            events_tx,
            shutdown_rx,
        ));

        let manager = Self {
            link,
            shutdown_tx,
            task: Some(task),
        };
        (manager, events_rx)
    }

    /// Fire-and-forget write to the open socket; dropped when disconnected.
    pub fn send(&self, message: OutboundMessage) -> Delivery {
        self.link.send(message)
    }

    /// Gateway for domain stores, sharing this manager's socket.
    pub fn gateway(&self) -> Arc<dyn CommandGateway> {
        self.link.clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.link.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.link.status.subscribe()
    }

    /// Close the socket, stop reconnecting and wait for the task to end.
    pub async fn shutdown(mut self) {
        self.shutdown_tx.send_replace(true);
        if let Some(mut task) = self.task.take()
            && tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut task).await.is_err()
        {
            tracing::warn!("Connection task did not stop in time, aborting it");
            task.abort();
        }
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_connection(
    url: String,
    policy: ReconnectPolicy,
    link: Arc<SocketLink>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut generation: u64 = 0;
    let mut attempts: u32 = 0;

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tracing::debug!("Connecting to {}", url);
        let connected = tokio::select! {
            result = connect_async(url.as_str()) => result.map_err(ConnectionError::Open),
            _ = shutdown_rx.changed() => break,
        };

        match connected {
            Ok((stream, _response)) => {
                generation += 1;
                attempts = 0;

                let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
                link.install(generation, outbound_tx);
                let opened_at = now_utc();
                tracing::info!("Connected to {} (socket #{})", url, generation);
                let _ = events.send(ConnectionEvent::Opened { generation });

                let reason = pump(stream, outbound_rx, &events, &mut shutdown_rx).await;

                link.uninstall();
                tracing::info!(
                    "Socket #{} {} after {} ms",
                    generation,
                    reason,
                    elapsed_millis(opened_at)
                );
                let shut_down = matches!(reason, CloseReason::Shutdown);
                let _ = events.send(ConnectionEvent::Closed { generation, reason });
                if shut_down {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("{} ({})", e, url);
            }
        }

        if !policy.should_retry(attempts) {
            tracing::error!(
                "Giving up on {} after {} reconnect attempts",
                url,
                attempts
            );
            link.set_status(ConnectionStatus::Failed);
            let _ = events.send(ConnectionEvent::Failed { attempts });
            return;
        }

        attempts += 1;
        link.set_status(ConnectionStatus::Reconnecting { attempt: attempts });
        tracing::info!(
            "Reconnecting in {} ms (attempt {}/{})",
            policy.interval.as_millis(),
            attempts,
            policy.max_attempts
        );
        tokio::select! {
            _ = tokio::time::sleep(policy.interval) => {}
            _ = shutdown_rx.changed() => break,
        }
    }

    link.set_status(ConnectionStatus::Closed);
    tracing::debug!("Connection task stopped");
}

/// Shuttle frames between one open socket and the rest of the process until
/// the socket ends.
async fn pump(
    stream: WsStream,
    mut outbound_rx: mpsc::UnboundedReceiver<String>,
    events: &mpsc::UnboundedSender<ConnectionEvent>,
    shutdown_rx: &mut watch::Receiver<bool>,
) -> CloseReason {
    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => {
                let Some(text) = outbound else {
                    return CloseReason::Shutdown;
                };
                if let Err(e) = sink.send(Message::Text(text.into())).await {
                    return CloseReason::Lost(ConnectionError::Write(e));
                }
            }

            inbound = source.next() => match inbound {
                Some(Ok(Message::Text(text))) => forward(text.as_str(), events),
                Some(Ok(Message::Close(frame))) => {
                    // Keep reading: the stream ends once the close handshake
                    // completes.
                    tracing::debug!("Server sent close frame: {:?}", frame);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return CloseReason::Lost(ConnectionError::Read(e)),
                None => return CloseReason::ServerClosed,
            },

            _ = shutdown_rx.changed() => {
                let _ = sink.send(Message::Close(None)).await;
                let _ = sink.close().await;
                return CloseReason::Shutdown;
            }
        }
    }
}

/// Longest excerpt of a rejected frame that goes into the log
const LOGGED_FRAME_CHARS: usize = 70;

/// First `LOGGED_FRAME_CHARS` characters of `text`, marked when cut.
fn excerpt(text: &str) -> String {
    match text.char_indices().nth(LOGGED_FRAME_CHARS) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

fn forward(text: &str, events: &mpsc::UnboundedSender<ConnectionEvent>) {
    match serde_json::from_str::<InboundMessage>(text) {
        Ok(message) => {
            let _ = events.send(ConnectionEvent::Message(message));
        }
        Err(e) => {
            tracing::warn!("Discarding malformed message: {} ({})", e, excerpt(text));
        }
    }
}
