//! UseCase: 同期セッション
//!
//! 接続タスクから届くイベントを順番に処理し、受信メッセージをルーターへ、
//! 接続通知をマウント中のストアへ渡します。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SyncSession::handle() と SyncSession::run() のイベント処理
//!
//! ### なぜこのテストが必要か
//! - 再接続後にハンドシェイク待ちのストアが init を送り直すことを保証する
//! - 恒久的な失敗でセッションが終了することを保証する

use std::sync::Arc;

use tokio::sync::mpsc;

use super::router::{DispatchOutcome, MessageRouter};
use crate::infrastructure::ConnectionEvent;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Reconnect budget exhausted
    Failed,
    /// Event feed closed after shutdown
    Closed,
}

/// 接続イベントをストアへ橋渡しするユースケース
pub struct SyncSession {
    router: Arc<MessageRouter>,
}

impl SyncSession {
    /// 新しい SyncSession を作成
    pub fn new(router: Arc<MessageRouter>) -> Self {
        Self { router }
    }

    /// イベントを 1 件処理する
    ///
    /// # Returns
    ///
    /// * `Some(SessionEnd)` - セッションが終了した
    /// * `None` - 処理を継続する
    pub fn handle(&self, event: ConnectionEvent) -> Option<SessionEnd> {
        match event {
            ConnectionEvent::Opened { generation } => {
                self.router.on_connected(generation);
                None
            }
            ConnectionEvent::Message(message) => {
                if let DispatchOutcome::Delivered(0) = self.router.dispatch(message) {
                    tracing::debug!("Snapshot was rejected by every mounted store");
                }
                None
            }
            ConnectionEvent::Closed { generation, reason } => {
                tracing::debug!("Session saw socket #{} close: {}", generation, reason);
                None
            }
            ConnectionEvent::Failed { attempts } => {
                tracing::error!("Connection failed permanently after {} attempts", attempts);
                Some(SessionEnd::Failed)
            }
        }
    }

    /// イベントフィードが終わるか、接続が恒久的に失敗するまで処理を続ける
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<ConnectionEvent>) -> SessionEnd {
        while let Some(event) = events.recv().await {
            if let Some(end) = self.handle(event) {
                return end;
            }
        }
        SessionEnd::Closed
    }
}
