//! Command-line arguments.

use std::time::Duration;

use clap::Parser;

use crate::{
    config::DashboardConfig,
    domain::Owner,
    infrastructure::{
        ReconnectPolicy,
        connection::{DEFAULT_MAX_RECONNECT_ATTEMPTS, DEFAULT_RECONNECT_INTERVAL},
    },
};

/// Terminal dashboard for a Serenity live session
#[derive(Parser, Debug)]
#[command(name = "serenity-dashboard")]
#[command(version, about)]
pub struct Args {
    /// Game-master WebSocket URL
    #[arg(long, env = "SERENITY_WS_URL")]
    pub url: String,

    /// Side you are playing (players or npcs)
    #[arg(long, default_value_t = Owner::Players)]
    pub owner: Owner,

    /// Delay between reconnect attempts, in milliseconds
    #[arg(long, default_value_t = DEFAULT_RECONNECT_INTERVAL.as_millis() as u64)]
    pub reconnect_interval_ms: u64,

    /// Consecutive reconnect attempts before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_RECONNECT_ATTEMPTS)]
    pub max_reconnect_attempts: u32,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl From<&Args> for DashboardConfig {
    fn from(args: &Args) -> Self {
        DashboardConfig::new(
            args.url.clone(),
            args.owner,
            ReconnectPolicy::new(
                Duration::from_millis(args.reconnect_interval_ms),
                args.max_reconnect_attempts,
            ),
        )
    }
}
