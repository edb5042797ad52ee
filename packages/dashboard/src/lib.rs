//! Real-time state-sync client for a Serenity live session.
//!
//! One WebSocket to the game master is kept alive for the whole session.
//! Pushed snapshots are routed by domain (travel, sonar, sonar config) to
//! the stores mounted for them, and the tactical grid is rendered through
//! fog of war for the operator's side.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::DashboardConfig;
pub use ui::run as run_dashboard;
