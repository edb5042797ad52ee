//! Terminal front end of the dashboard.

pub mod cli;
pub mod error;
pub mod render;
pub mod repl;
mod runner;

pub use error::{DashboardError, InputError};
pub use runner::run;
