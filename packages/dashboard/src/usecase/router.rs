//! UseCase: メッセージルーター
//!
//! 受信メッセージを `concerns` タグで分類し、マウント中のドメインストアに
//! スナップショットを届けます。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - concern ごとの配送と、未マウント・未知タグの破棄
//! - ストアのアンマウント (drop) による自動的な登録解除
//! - 接続通知の転送
//!
//! ### なぜこのテストが必要か
//! - 未知のタグや未マウントのストア宛てのメッセージでクライアントが落ちないことを保証する
//! - アンマウント済みのストアにメッセージが届き続けないことを保証する

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, Weak},
};

use serde_json::Value;

use super::error::RouteError;
use crate::domain::{Concern, InboundMessage};

/// Receiving side of a mounted store, as seen by the router.
pub(crate) trait Route: Send + Sync {
    /// Replace the store's snapshot with `data`.
    fn replace(&self, data: Value) -> Result<(), RouteError>;

    /// A socket with this generation has just opened.
    fn on_connected(&self, generation: u64);
}

/// Result of routing one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// `concerns` names no known domain
    UnknownConcern,
    /// Known domain, but no store for it is mounted
    NotMounted,
    /// Number of stores whose snapshot was replaced
    Delivered(usize),
}

/// Classifies inbound messages by domain tag and forwards them to the
/// mounted stores.
#[derive(Default)]
pub struct MessageRouter {
    routes: Mutex<HashMap<Concern, Vec<Weak<dyn Route>>>>,
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, concern: Concern, route: Weak<dyn Route>) {
        tracing::debug!("Mounted a {} store", concern);
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(concern)
            .or_default()
            .push(route);
    }

    /// Live routes for `concern`; unmounted ones are pruned on the way.
    fn live_routes(&self, concern: Concern) -> Vec<Arc<dyn Route>> {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(registered) = routes.get_mut(&concern) else {
            return Vec::new();
        };
        registered.retain(|route| route.strong_count() > 0);
        registered.iter().filter_map(Weak::upgrade).collect()
    }

    /// Forward one message to every store mounted for its concern.
    pub fn dispatch(&self, message: InboundMessage) -> DispatchOutcome {
        let Some(concern) = message.concern() else {
            tracing::debug!(
                "Ignoring {} message for unconsumed concern `{}`",
                message.kind.as_deref().unwrap_or("untyped"),
                message.concerns
            );
            return DispatchOutcome::UnknownConcern;
        };

        let routes = self.live_routes(concern);
        if routes.is_empty() {
            tracing::debug!("No {} store mounted, dropping snapshot", concern);
            return DispatchOutcome::NotMounted;
        }

        let mut delivered = 0;
        for route in routes {
            match route.replace(message.data.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!("Discarding snapshot: {}", e),
            }
        }
        DispatchOutcome::Delivered(delivered)
    }

    /// Tell every mounted store that a new socket is open.
    pub fn on_connected(&self, generation: u64) {
        for concern in Concern::ALL {
            for route in self.live_routes(concern) {
                route.on_connected(generation);
            }
        }
    }

    /// Number of stores currently mounted for `concern`.
    pub fn mounted(&self, concern: Concern) -> usize {
        self.live_routes(concern).len()
    }
}
