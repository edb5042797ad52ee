//! UseCase 層
//!
//! 受信したスナップショットをドメインストアへ届け、ストアから
//! コマンドを送信するレイヤー。
//! UI 層から呼び出され、Domain 層と接続 (Infrastructure 層) をつなぎます。

pub mod error;
pub mod router;
pub mod store;
pub mod sync_session;

pub use error::{CommandError, RouteError};
pub use router::{DispatchOutcome, MessageRouter};
pub use store::{DomainStore, StoreState, StoreView, StoreWatcher};
pub use sync_session::{SessionEnd, SyncSession};
