/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::tier::PolicyError;

/// Quota-limited resources a user can create
/// Used by the quota checks, the limits endpoint and the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Alerts,
    Watchlist,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Alerts => "alerts",
            ResourceKind::Watchlist => "watchlist",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alerts" => Ok(ResourceKind::Alerts),
            "watchlist" => Ok(ResourceKind::Watchlist),
            other => Err(PolicyError::InvalidResource(other.to_string())),
        }
    }
}
