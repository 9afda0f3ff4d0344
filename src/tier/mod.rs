// tier/mod.rs - Subscription tier model and policy evaluation
//
// Everything under this module is pure: a `TierPolicy` table plus functions
// that read it. Session lookups and HTTP concerns live in `session`,
// `permissions` and `middleware`.

pub mod decision;
pub mod error;
pub mod helpers;
pub mod policy;
pub mod quota;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use decision::{Decision, Denial, DenialKind, Grant, PermissionCheckResult, ValidationResult};
pub use error::PolicyError;
pub use policy::{TierConfig, TierFeatures, TierPolicy};

/// Subscription tier. Ordered so that `Tier::Pro > Tier::Free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    #[default]
    Free,
    Pro,
}

impl Tier {
    pub const ALL: [Tier; 2] = [Tier::Free, Tier::Pro];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "FREE",
            Tier::Pro => "PRO",
        }
    }

    /// Next tier up, if any
    pub fn upgrade_target(&self) -> Option<Tier> {
        match self {
            Tier::Free => Some(Tier::Pro),
            Tier::Pro => None,
        }
    }

    /// Whether this tier meets a minimum requirement
    pub fn satisfies(&self, required: Tier) -> bool {
        *self >= required
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FREE" => Ok(Tier::Free),
            "PRO" => Ok(Tier::Pro),
            other => Err(PolicyError::InvalidTier(other.to_string())),
        }
    }
}

/// Account role, orthogonal to tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(PolicyError::InvalidRole(other.to_string())),
        }
    }
}

/// Set of permitted symbols or timeframes for a tier.
///
/// `All` replaces the old `["*"]` sentinel so a wildcard can never be
/// mistaken for a literal ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allowed {
    All,
    Only(Vec<String>),
}

impl Allowed {
    /// Build an explicit set, dropping duplicates while keeping first-seen order
    pub fn only<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for item in items {
            let item = item.into();
            if !out.contains(&item) {
                out.push(item);
            }
        }
        Allowed::Only(out)
    }

    /// Exact, case-sensitive membership
    pub fn permits(&self, value: &str) -> bool {
        match self {
            Allowed::All => true,
            Allowed::Only(items) => items.iter().any(|i| i == value),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Allowed::All)
    }

    /// Number of explicit entries; `None` for the wildcard
    pub fn len(&self) -> Option<usize> {
        match self {
            Allowed::All => None,
            Allowed::Only(items) => Some(items.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Allowed::Only(items) if items.is_empty())
    }

    /// Concrete listing, expanding the wildcard to the given catalog
    pub fn expand(&self, catalog: &[&str]) -> Vec<String> {
        match self {
            Allowed::All => catalog.iter().map(|s| s.to_string()).collect(),
            Allowed::Only(items) => items.clone(),
        }
    }
}
