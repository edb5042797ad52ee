//! Shared utilities for the Serenity dashboard crates.

pub mod logger;
pub mod time;
