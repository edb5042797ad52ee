//! Runtime configuration of the dashboard.

use crate::{domain::Owner, infrastructure::ReconnectPolicy};

/// Everything the dashboard needs to start a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Game-master WebSocket endpoint
    pub url: String,
    /// Side the operator plays; drives fog of war and command ownership
    pub owner: Owner,
    pub policy: ReconnectPolicy,
}

impl DashboardConfig {
    pub fn new(url: impl Into<String>, owner: Owner, policy: ReconnectPolicy) -> Self {
        Self {
            url: url.into(),
            owner,
            policy,
        }
    }
}
