//! UseCase: ドメインストア
//!
//! concern ごとに最新のスナップショットを保持し、初期化ハンドシェイクを行い、
//! 利用側にスナップショットと concern 専用のコマンド送信を提供します。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DomainStore の状態遷移 (Uninitialized → AwaitingSnapshot → Ready)
//! - init の送信回数と再接続時の再送条件
//! - スナップショットの置き換え (マージしない)
//!
//! ### なぜこのテストが必要か
//! - init の重複送信や送り漏れはサーバー側の状態と表示のずれに直結する
//! - 不整合なスナップショットで表示中の状態を壊さないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続済みでのマウント、スナップショット受信
//! - 異常系：未接続でのマウント、壊れたスナップショット
//! - エッジケース：init 送信後の切断と再接続

use std::sync::{Arc, Weak};

use serde_json::Value;
use tokio::sync::watch;

use super::{
    error::{CommandError, RouteError},
    router::{MessageRouter, Route},
};
use crate::domain::{CommandGateway, Delivery, Domain, OutboundMessage};

/// Lifecycle of a store.
#[derive(Debug)]
pub enum StoreState<S> {
    /// No snapshot, handshake not sent yet
    Uninitialized,
    /// Handshake sent, no snapshot yet
    AwaitingSnapshot,
    /// At least one snapshot received
    Ready(Arc<S>),
}

impl<S> StoreState<S> {
    pub fn snapshot(&self) -> Option<&Arc<S>> {
        match self {
            StoreState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, StoreState::Ready(_))
    }
}

impl<S> Clone for StoreState<S> {
    fn clone(&self) -> Self {
        match self {
            StoreState::Uninitialized => StoreState::Uninitialized,
            StoreState::AwaitingSnapshot => StoreState::AwaitingSnapshot,
            StoreState::Ready(snapshot) => StoreState::Ready(Arc::clone(snapshot)),
        }
    }
}

/// What a consumer should render.
#[derive(Debug)]
pub enum StoreView<S> {
    /// Loading or reconnecting
    NotReady,
    Ready(Arc<S>),
    /// The connection gave up; the session is out of service
    Failed,
}

struct Slot<S> {
    state: StoreState<S>,
    /// Socket generation the pending handshake went out on
    handshake_generation: Option<u64>,
}

struct StoreInner<D: Domain> {
    slot: watch::Sender<Slot<D::Snapshot>>,
    gateway: Arc<dyn CommandGateway>,
}

impl<D: Domain> StoreInner<D> {
    /// Send `init` if this store still needs one on the socket currently
    /// open. `reopened` is the generation of a socket that just opened.
    fn handshake(&self, reopened: Option<u64>) {
        self.slot.send_if_modified(|slot| {
            let due = match (&slot.state, slot.handshake_generation, reopened) {
                (StoreState::Uninitialized, _, _) => true,
                // The pending request went out on a socket that has since
                // closed; the answer will never come.
                (StoreState::AwaitingSnapshot, Some(sent_on), Some(current)) => sent_on < current,
                _ => false,
            };
            if !due {
                return false;
            }

            match self.gateway.send(OutboundMessage::init(D::CONCERN)) {
                Delivery::Written { generation } => {
                    tracing::info!("Sent init for {} on socket #{}", D::CONCERN, generation);
                    slot.handshake_generation = Some(generation);
                    let first = matches!(slot.state, StoreState::Uninitialized);
                    slot.state = StoreState::AwaitingSnapshot;
                    first
                }
                Delivery::Dropped => {
                    tracing::debug!("Init for {} deferred until a socket opens", D::CONCERN);
                    false
                }
            }
        });
    }
}

impl<D: Domain> Route for StoreInner<D> {
    fn replace(&self, data: Value) -> Result<(), RouteError> {
        let snapshot: D::Snapshot =
            serde_json::from_value(data).map_err(|source| RouteError::Decode {
                concern: D::CONCERN,
                source,
            })?;
        D::validate(&snapshot).map_err(|source| RouteError::Inconsistent {
            concern: D::CONCERN,
            source,
        })?;

        let snapshot = Arc::new(snapshot);
        self.slot.send_modify(|slot| {
            if !slot.state.is_ready() {
                tracing::info!("{} store is ready", D::CONCERN);
            }
            slot.state = StoreState::Ready(snapshot);
        });
        Ok(())
    }

    fn on_connected(&self, generation: u64) {
        self.handshake(Some(generation));
    }
}

/// Latest snapshot of one concern plus its command sender.
///
/// A store is created by [`DomainStore::mount`] when the region that shows
/// the concern appears, and torn down by dropping every handle to it. Clones
/// share the same state.
pub struct DomainStore<D: Domain> {
    inner: Arc<StoreInner<D>>,
}

impl<D: Domain> Clone for DomainStore<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Domain> DomainStore<D> {
    /// Create a store, register it with `router` and send the handshake if
    /// a socket is open. Otherwise the handshake goes out as soon as the
    /// router reports the next open socket.
    pub fn mount(router: &MessageRouter, gateway: Arc<dyn CommandGateway>) -> Self {
        let (slot, _) = watch::channel(Slot {
            state: StoreState::Uninitialized,
            handshake_generation: None,
        });
        let inner = Arc::new(StoreInner::<D> { slot, gateway });

        let route: Weak<dyn Route> = Arc::downgrade(&inner) as Weak<dyn Route>;
        router.register(D::CONCERN, route);
        inner.handshake(None);

        Self { inner }
    }

    pub fn state(&self) -> StoreState<D::Snapshot> {
        self.inner.slot.borrow().state.clone()
    }

    /// The latest snapshot, `None` until the first one arrives.
    pub fn current_snapshot(&self) -> Option<Arc<D::Snapshot>> {
        self.inner.slot.borrow().state.snapshot().cloned()
    }

    pub fn view(&self) -> StoreView<D::Snapshot> {
        if self.inner.gateway.is_failed() {
            return StoreView::Failed;
        }
        match self.current_snapshot() {
            Some(snapshot) => StoreView::Ready(snapshot),
            None => StoreView::NotReady,
        }
    }

    /// Send a command for this concern. Fire-and-forget: the returned
    /// `Delivery` only says whether a socket took it.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Encode` when the command cannot be wrapped into
    /// an envelope.
    pub fn send_command(&self, command: D::Command) -> Result<Delivery, CommandError> {
        let message =
            OutboundMessage::command(D::CONCERN, &command).map_err(|source| CommandError::Encode {
                concern: D::CONCERN,
                source,
            })?;
        let delivery = self.inner.gateway.send(message);
        if !delivery.is_written() {
            tracing::debug!("Command {:?} dropped while disconnected", command);
        }
        Ok(delivery)
    }

    /// Change feed for consumers that re-render on every new state.
    pub fn subscribe(&self) -> StoreWatcher<D::Snapshot> {
        StoreWatcher {
            rx: self.inner.slot.subscribe(),
        }
    }
}

/// Receives a notification every time a store's state changes.
pub struct StoreWatcher<S> {
    rx: watch::Receiver<Slot<S>>,
}

impl<S> StoreWatcher<S> {
    /// Wait for the next state change. Returns `false` once the store has
    /// been unmounted.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    pub fn state(&self) -> StoreState<S> {
        self.rx.borrow().state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Concern, Direction, InboundMessage, MockCommandGateway, Owner, SonarCommand,
        SonarConfigDomain, SonarDomain, TravelDomain,
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn sonar_snapshot(in_battle: bool) -> Value {
        json!({"in_battle": in_battle, "map": null})
    }

    fn open_gateway(generation: u64, expected_inits: usize) -> MockCommandGateway {
        let mut gateway = MockCommandGateway::new();
        gateway
            .expect_send()
            .withf(|message| message.is_init())
            .times(expected_inits)
            .returning(move |_| Delivery::Written { generation });
        gateway.expect_is_failed().return_const(false);
        gateway
    }

    #[test]
    fn test_mount_while_open_sends_one_init() {
        // テスト項目: 接続中にマウントすると init が 1 回だけ送られる
        // given (前提条件):
        let router = MessageRouter::new();
        let gateway = Arc::new(open_gateway(1, 1));

        // when (操作):
        let store = DomainStore::<SonarDomain>::mount(&router, gateway);

        // then (期待する結果):
        assert!(matches!(store.state(), StoreState::AwaitingSnapshot));
        assert!(store.current_snapshot().is_none());
        assert!(matches!(store.view(), StoreView::NotReady));
    }

    #[test]
    fn test_mount_while_disconnected_defers_init() {
        // テスト項目: 未接続でマウントすると init は保留され、接続時に送られる
        // given (前提条件):
        let router = MessageRouter::new();
        let generation = Arc::new(AtomicU64::new(0));
        let current = Arc::clone(&generation);
        let mut gateway = MockCommandGateway::new();
        gateway
            .expect_send()
            .withf(|message| message.is_init())
            .times(2)
            .returning(move |_| match current.load(Ordering::SeqCst) {
                0 => Delivery::Dropped,
                generation => Delivery::Written { generation },
            });
        let store = DomainStore::<TravelDomain>::mount(&router, Arc::new(gateway));
        assert!(matches!(store.state(), StoreState::Uninitialized));

        // when (操作): ソケット #1 が開く
        generation.store(1, Ordering::SeqCst);
        router.on_connected(1);

        // then (期待する結果):
        assert!(matches!(store.state(), StoreState::AwaitingSnapshot));

        // when (操作): 同じソケットの接続通知が重ねて届いても再送しない
        router.on_connected(1);
        assert!(matches!(store.state(), StoreState::AwaitingSnapshot));
    }

    #[test]
    fn test_first_snapshot_makes_store_ready_and_no_more_inits() {
        // テスト項目: 最初のスナップショットで Ready になり、その後 init は送られない
        // given (前提条件):
        let router = MessageRouter::new();
        let store = DomainStore::<SonarDomain>::mount(&router, Arc::new(open_gateway(1, 1)));

        // when (操作):
        router.dispatch(InboundMessage::snapshot(Concern::Sonar, sonar_snapshot(false)));
        router.on_connected(2);

        // then (期待する結果):
        let snapshot = store.current_snapshot().unwrap();
        assert!(!snapshot.in_battle);
        assert!(store.state().is_ready());
    }

    #[test]
    fn test_snapshots_replace_wholesale() {
        // テスト項目: スナップショットは毎回丸ごと置き換えられる (マージしない)
        // given (前提条件):
        let router = MessageRouter::new();
        let store = DomainStore::<SonarConfigDomain>::mount(&router, Arc::new(open_gateway(1, 1)));
        let first = json!({
            "torpedo_damage": 2, "torpedo_reach": 4, "torpedo_radius": 1,
            "mine_damage": 3, "mine_reach": 1, "mine_radius": 0,
            "player_default_hp": 5, "use_control_panel": true
        });
        let second = json!({
            "torpedo_damage": 1, "torpedo_reach": 2, "torpedo_radius": 0,
            "mine_damage": 1, "mine_reach": 1, "mine_radius": 1
        });

        // when (操作):
        store.inner.replace(first).unwrap();
        store.inner.replace(second).unwrap();

        // then (期待する結果): 2 通目に無いフィールドは 1 通目の値を引き継がない
        let config = store.current_snapshot().unwrap();
        assert_eq!(config.torpedo_damage, 1);
        assert_eq!(config.player_default_hp, None);
        assert!(!config.use_control_panel);
    }

    #[test]
    fn test_invalid_snapshot_keeps_previous() {
        // テスト項目: 壊れたスナップショットは破棄され、直前のスナップショットが残る
        // given (前提条件):
        let router = MessageRouter::new();
        let store = DomainStore::<SonarDomain>::mount(&router, Arc::new(open_gateway(1, 1)));
        store.inner.replace(sonar_snapshot(true)).unwrap();

        // when (操作):
        let undecodable = store.inner.replace(json!({"map": 3}));
        let inconsistent = store.inner.replace(json!({
            "in_battle": true,
            "map": {
                "width": 2, "height": 2, "grid": [[{}, {}]],
                "player_ship": {"name": "Serenity", "hp": 3, "total_hp": 3},
                "npc_ship": {"name": "Reaver", "hp": 3, "total_hp": 3}
            }
        }));

        // then (期待する結果):
        assert!(matches!(undecodable, Err(RouteError::Decode { .. })));
        assert!(matches!(inconsistent, Err(RouteError::Inconsistent { .. })));
        let snapshot = store.current_snapshot().unwrap();
        assert!(snapshot.in_battle);
        assert!(snapshot.map.is_none());
    }

    #[test]
    fn test_lost_handshake_is_resent_on_next_socket() {
        // テスト項目: init を送ったソケットが閉じた場合、次のソケットで 1 回だけ再送される
        // given (前提条件):
        let router = MessageRouter::new();
        let generation = Arc::new(AtomicU64::new(1));
        let current = Arc::clone(&generation);
        let mut gateway = MockCommandGateway::new();
        gateway
            .expect_send()
            .withf(|message| message.is_init())
            .times(2)
            .returning(move |_| Delivery::Written {
                generation: current.load(Ordering::SeqCst),
            });
        let store = DomainStore::<SonarDomain>::mount(&router, Arc::new(gateway));

        // when (操作): ソケット #2 に再接続
        generation.store(2, Ordering::SeqCst);
        router.on_connected(2);
        router.on_connected(2);

        // then (期待する結果):
        assert!(matches!(store.state(), StoreState::AwaitingSnapshot));
    }

    #[test]
    fn test_send_command_builds_command_envelope() {
        // テスト項目: コマンドは concern を付けた command 封筒として送られる
        // given (前提条件):
        let router = MessageRouter::new();
        let mut gateway = MockCommandGateway::new();
        gateway
            .expect_send()
            .withf(|message| message.is_init())
            .times(1)
            .returning(|_| Delivery::Written { generation: 1 });
        gateway
            .expect_send()
            .withf(|message| {
                message.kind == "move"
                    && message.concerns == Concern::Sonar
                    && message.data == json!({"owner": "players", "direction": "north"})
            })
            .times(1)
            .returning(|_| Delivery::Written { generation: 1 });
        let store = DomainStore::<SonarDomain>::mount(&router, Arc::new(gateway));

        // when (操作):
        let delivery = store.send_command(SonarCommand::Move {
            owner: Owner::Players,
            direction: Direction::North,
        });

        // then (期待する結果):
        assert_eq!(delivery.unwrap(), Delivery::Written { generation: 1 });
    }

    #[test]
    fn test_send_command_while_disconnected_is_dropped() {
        // テスト項目: 未接続中のコマンドはエラーにならず破棄される
        // given (前提条件):
        let router = MessageRouter::new();
        let mut gateway = MockCommandGateway::new();
        gateway.expect_send().returning(|_| Delivery::Dropped);
        let store = DomainStore::<SonarDomain>::mount(&router, Arc::new(gateway));

        // when (操作):
        let delivery = store.send_command(SonarCommand::Move {
            owner: Owner::Players,
            direction: Direction::North,
        });

        // then (期待する結果):
        assert_eq!(delivery.unwrap(), Delivery::Dropped);
        assert!(matches!(store.state(), StoreState::Uninitialized));
    }

    #[test]
    fn test_view_reports_permanent_failure() {
        // テスト項目: 接続が恒久的に失敗した場合、view は Failed を返す
        // given (前提条件):
        let router = MessageRouter::new();
        let mut gateway = MockCommandGateway::new();
        gateway.expect_send().returning(|_| Delivery::Dropped);
        gateway.expect_is_failed().return_const(true);
        let store = DomainStore::<TravelDomain>::mount(&router, Arc::new(gateway));

        // then (期待する結果):
        assert!(matches!(store.view(), StoreView::Failed));
    }

    #[tokio::test]
    async fn test_watcher_sees_changes_and_unmount() {
        // テスト項目: 購読者は状態変化を受け取り、アンマウント後は false を受け取る
        // given (前提条件):
        let router = MessageRouter::new();
        let store = DomainStore::<SonarDomain>::mount(&router, Arc::new(open_gateway(1, 1)));
        let mut watcher = store.subscribe();

        // when (操作):
        store.inner.replace(sonar_snapshot(true)).unwrap();

        // then (期待する結果):
        assert!(watcher.changed().await);
        assert!(watcher.state().is_ready());

        // when (操作): ストアを破棄する
        drop(store);

        // then (期待する結果):
        assert!(!watcher.changed().await);
    }
}
