//! Test fixtures: a scripted fake game master.
//!
//! The fake listens on an ephemeral port and hands each accepted socket to
//! the test, which then decides what to receive and push.

#![allow(dead_code)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{WebSocketStream, accept_async, tungstenite::Message};

/// Upper bound for any single wait in the integration tests.
pub const WAIT: Duration = Duration::from_secs(5);

/// Fake game-master server
pub struct FakeGameMaster {
    listener: TcpListener,
    url: String,
}

impl FakeGameMaster {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake game master");
        let addr = listener.local_addr().expect("Failed to read local address");
        Self {
            listener,
            url: format!("ws://{addr}/ws"),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Wait for the dashboard to open a socket.
    pub async fn accept(&self) -> GameMasterSocket {
        let (stream, _) = tokio::time::timeout(WAIT, self.listener.accept())
            .await
            .expect("Timed out waiting for the dashboard to connect")
            .expect("Failed to accept connection");
        let ws = accept_async(stream)
            .await
            .expect("WebSocket handshake failed");
        GameMasterSocket { ws }
    }

    /// Accept a socket only if the dashboard connects `within` the window.
    pub async fn try_accept(&self, within: Duration) -> Option<GameMasterSocket> {
        let (stream, _) = tokio::time::timeout(within, self.listener.accept())
            .await
            .ok()?
            .expect("Failed to accept connection");
        let ws = accept_async(stream)
            .await
            .expect("WebSocket handshake failed");
        Some(GameMasterSocket { ws })
    }
}

/// URL on which nothing listens.
pub async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind throwaway listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("ws://{addr}/ws")
}

/// Server side of one dashboard socket
pub struct GameMasterSocket {
    ws: WebSocketStream<TcpStream>,
}

impl GameMasterSocket {
    /// Next JSON message sent by the dashboard.
    pub async fn recv_json(&mut self) -> Value {
        loop {
            let frame = tokio::time::timeout(WAIT, self.ws.next())
                .await
                .expect("Timed out waiting for a message from the dashboard")
                .expect("Socket ended before a message arrived")
                .expect("Failed to read from socket");
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).expect("Dashboard sent invalid JSON");
            }
        }
    }

    /// Push a state snapshot for `concerns`.
    pub async fn push(&mut self, concerns: &str, data: Value) {
        self.broadcast(concerns, "state", data).await;
    }

    /// Push a configuration snapshot for `concerns`.
    pub async fn push_config(&mut self, concerns: &str, data: Value) {
        self.broadcast(concerns, "config", data).await;
    }

    async fn broadcast(&mut self, concerns: &str, kind: &str, data: Value) {
        let envelope = serde_json::json!({
            "topic": "broadcast_status",
            "type": kind,
            "concerns": concerns,
            "data": data,
        });
        self.push_raw(&envelope.to_string()).await;
    }

    pub async fn push_raw(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to push message");
    }

    /// Close the socket from the server side.
    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }

    /// Whether the dashboard ended the socket (close frame or EOF).
    pub async fn ended(&mut self) -> bool {
        loop {
            match tokio::time::timeout(WAIT, self.ws.next()).await {
                Err(_) => return false,
                Ok(None) | Ok(Some(Err(_))) | Ok(Some(Ok(Message::Close(_)))) => return true,
                Ok(Some(Ok(_))) => continue,
            }
        }
    }
}

pub fn sonar_config() -> Value {
    serde_json::json!({
        "torpedo_damage": 2,
        "torpedo_reach": 4,
        "torpedo_radius": 1,
        "mine_damage": 3,
        "mine_reach": 2,
        "mine_radius": 1,
        "player_default_hp": 10,
        "use_control_panel": true,
    })
}

pub fn sonar_snapshot(in_battle: bool) -> Value {
    serde_json::json!({ "in_battle": in_battle, "map": null })
}
