use thiserror::Error;

use crate::tier::{Denial, DenialKind, Tier};

/// Failure of an authorization guard (`require_*`, `check_permission`)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{message}")]
    Forbidden { code: &'static str, message: String },

    #[error("{message}")]
    TierAccess {
        message: String,
        required_tier: Tier,
        current_tier: Tier,
    },
}

impl AuthError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AuthError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AuthError::Forbidden { code: "FORBIDDEN", message: message.into() }
    }

    pub fn not_affiliate(message: impl Into<String>) -> Self {
        AuthError::Forbidden { code: "NOT_AFFILIATE", message: message.into() }
    }

    pub fn tier_access(message: impl Into<String>, required_tier: Tier, current_tier: Tier) -> Self {
        AuthError::TierAccess { message: message.into(), required_tier, current_tier }
    }

    /// Map a policy denial onto the guard error family
    pub fn from_denial(denial: Denial, current_tier: Tier) -> Self {
        match denial.kind {
            DenialKind::Unauthenticated => AuthError::Unauthorized(denial.reason),
            DenialKind::Role => AuthError::forbidden(denial.reason),
            DenialKind::Affiliate => AuthError::not_affiliate(denial.reason),
            DenialKind::Quota => AuthError::Forbidden { code: "LIMIT_REACHED", message: denial.reason },
            DenialKind::Tier => AuthError::TierAccess {
                message: denial.reason,
                required_tier: denial.required_tier.unwrap_or(Tier::Pro),
                current_tier,
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Unauthorized(_) => "UNAUTHORIZED",
            AuthError::Forbidden { code, .. } => code,
            AuthError::TierAccess { .. } => "TIER_ACCESS_ERROR",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Unauthorized(_) => 401,
            AuthError::Forbidden { .. } | AuthError::TierAccess { .. } => 403,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::Decision;

    fn denial(decision: Decision) -> Denial {
        match decision {
            Decision::Denied(d) => d,
            Decision::Allowed(_) => panic!("expected a denial"),
        }
    }

    #[test]
    fn tier_denial_becomes_tier_access_error() {
        let d = denial(Decision::deny(DenialKind::Tier, "All symbols require PRO tier subscription").requiring_tier(Tier::Pro));
        let err = AuthError::from_denial(d, Tier::Free);

        assert_eq!(err.code(), "TIER_ACCESS_ERROR");
        assert_eq!(err.status_code(), 403);
        assert_eq!(
            err,
            AuthError::tier_access("All symbols require PRO tier subscription", Tier::Pro, Tier::Free)
        );
    }

    #[test]
    fn codes_and_statuses() {
        assert_eq!(AuthError::unauthorized("x").status_code(), 401);
        assert_eq!(AuthError::unauthorized("x").code(), "UNAUTHORIZED");
        assert_eq!(AuthError::forbidden("x").code(), "FORBIDDEN");
        assert_eq!(AuthError::not_affiliate("x").code(), "NOT_AFFILIATE");

        let quota = denial(Decision::deny(DenialKind::Quota, "full"));
        assert_eq!(AuthError::from_denial(quota, Tier::Free).code(), "LIMIT_REACHED");
    }
}
