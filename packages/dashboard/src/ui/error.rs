//! UI 層のエラー定義

use thiserror::Error;

use crate::domain::{CoordinateError, ValueObjectError};

/// ダッシュボード実行時のエラー
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The connection gave up reconnecting
    #[error("the dashboard is out of service: connection to the game master was lost")]
    OutOfService,

    /// The prompt could not be started
    #[error("failed to start the command prompt: {0}")]
    Prompt(#[from] rustyline::error::ReadlineError),
}

/// プロンプト入力を解釈できなかった理由
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command `{0}` (type `help`)")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("no battle map yet, cannot aim")]
    NoBattleMap,

    #[error("hp must be a positive integer (got: {0})")]
    InvalidHp(String),

    #[error(transparent)]
    Coordinate(#[from] CoordinateError),

    #[error(transparent)]
    Value(#[from] ValueObjectError),
}
