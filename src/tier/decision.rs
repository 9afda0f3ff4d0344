use serde::{Deserialize, Serialize};

use super::{Role, Tier};

/// Why a request was denied. Drives the error kind callers see when they
/// convert a decision into a `Result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    Role,
    Tier,
    Affiliate,
    Quota,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grant {
    /// Informational text, e.g. the tier's quota for a feature
    pub note: Option<String>,
    pub required_tier: Option<Tier>,
    pub required_role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub kind: DenialKind,
    pub reason: String,
    pub required_tier: Option<Tier>,
    pub required_role: Option<Role>,
}

/// Outcome of every policy query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed(Grant),
    Denied(Denial),
}

impl Decision {
    pub fn allow() -> Self {
        Decision::Allowed(Grant::default())
    }

    pub fn allow_with_note(note: impl Into<String>) -> Self {
        Decision::Allowed(Grant {
            note: Some(note.into()),
            ..Grant::default()
        })
    }

    pub fn deny(kind: DenialKind, reason: impl Into<String>) -> Self {
        Decision::Denied(Denial {
            kind,
            reason: reason.into(),
            required_tier: None,
            required_role: None,
        })
    }

    pub fn requiring_tier(mut self, tier: Tier) -> Self {
        match &mut self {
            Decision::Allowed(g) => g.required_tier = Some(tier),
            Decision::Denied(d) => d.required_tier = Some(tier),
        }
        self
    }

    pub fn requiring_role(mut self, role: Role) -> Self {
        match &mut self {
            Decision::Allowed(g) => g.required_role = Some(role),
            Decision::Denied(d) => d.required_role = Some(role),
        }
        self
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed(_))
    }

    /// Denial reason or grant note
    pub fn reason(&self) -> Option<&str> {
        match self {
            Decision::Allowed(g) => g.note.as_deref(),
            Decision::Denied(d) => Some(d.reason.as_str()),
        }
    }

    pub fn required_tier(&self) -> Option<Tier> {
        match self {
            Decision::Allowed(g) => g.required_tier,
            Decision::Denied(d) => d.required_tier,
        }
    }

    pub fn required_role(&self) -> Option<Role> {
        match self {
            Decision::Allowed(g) => g.required_role,
            Decision::Denied(d) => d.required_role,
        }
    }

    /// Evaluate `next` only when this decision allows
    pub fn and_then(self, next: impl FnOnce() -> Decision) -> Decision {
        match self {
            Decision::Allowed(_) => next(),
            denied => denied,
        }
    }
}

/// `{ allowed, reason? }` view returned by the symbol/timeframe/quota checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<Decision> for ValidationResult {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Allowed(g) => ValidationResult { allowed: true, reason: g.note },
            Decision::Denied(d) => ValidationResult { allowed: false, reason: Some(d.reason) },
        }
    }
}

/// `{ canAccess, reason?, requiredTier?, requiredRole? }` view returned by
/// the feature permission layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCheckResult {
    pub can_access: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_tier: Option<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_role: Option<Role>,
}

impl From<Decision> for PermissionCheckResult {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Allowed(g) => PermissionCheckResult {
                can_access: true,
                reason: g.note,
                required_tier: g.required_tier,
                required_role: g.required_role,
            },
            Decision::Denied(d) => PermissionCheckResult {
                can_access: false,
                reason: Some(d.reason),
                required_tier: d.required_tier,
                required_role: d.required_role,
            },
        }
    }
}
