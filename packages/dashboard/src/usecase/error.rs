//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{Concern, SnapshotError};

/// スナップショットをストアに反映できなかった理由
#[derive(Debug, Error)]
pub enum RouteError {
    /// `data` could not be decoded into the concern's snapshot type
    #[error("failed to decode {concern} snapshot: {source}")]
    Decode {
        concern: Concern,
        #[source]
        source: serde_json::Error,
    },

    /// Decoded snapshot failed its consistency check
    #[error("inconsistent {concern} snapshot: {source}")]
    Inconsistent {
        concern: Concern,
        #[source]
        source: SnapshotError,
    },
}

/// コマンド送信のエラー
#[derive(Debug, Error)]
pub enum CommandError {
    /// Command could not be wrapped into an envelope
    #[error("failed to encode {concern} command: {source}")]
    Encode {
        concern: Concern,
        #[source]
        source: serde_json::Error,
    },
}
