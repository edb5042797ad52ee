//! Terminal dashboard for a Serenity live session.
//!
//! Run with:
//! ```not_rust
//! SERENITY_WS_URL=ws://localhost:8000/ws cargo run --bin serenity-dashboard -- --owner players
//! ```

use clap::Parser;
use serenity_dashboard::{DashboardConfig, ui::cli::Args};
use serenity_shared::logger::setup_logger;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Err(e) = serenity_dashboard::run_dashboard(DashboardConfig::from(&args)).await {
        tracing::error!("Dashboard error: {}", e);
        std::process::exit(1);
    }
}
