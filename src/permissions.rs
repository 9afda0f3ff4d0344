// permissions.rs - Named feature permissions and session-tier access
//
// `evaluate_feature` is the whole decision table; `PermissionService` binds
// it (and the tier validators) to the current session.

use futures::future::BoxFuture;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::auth::AuthError;
use crate::session::{SessionProvider, SessionUser, Sessions};
use crate::tier::quota::{self, TierLimitCheck};
use crate::tier::{validation, Decision, DenialKind, PermissionCheckResult, Role, Tier, TierPolicy};
use crate::types::ResourceKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Feature {
    Alerts,
    Watchlist,
    AllSymbols,
    AllTimeframes,
    ApiAccess,
    AdminDashboard,
    AffiliateDashboard,
    AffiliateCodes,
    CommissionReports,
    Other(String),
}

impl Feature {
    pub fn as_str(&self) -> &str {
        match self {
            Feature::Alerts => "alerts",
            Feature::Watchlist => "watchlist",
            Feature::AllSymbols => "all_symbols",
            Feature::AllTimeframes => "all_timeframes",
            Feature::ApiAccess => "api_access",
            Feature::AdminDashboard => "admin_dashboard",
            Feature::AffiliateDashboard => "affiliate_dashboard",
            Feature::AffiliateCodes => "affiliate_codes",
            Feature::CommissionReports => "commission_reports",
            Feature::Other(name) => name,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown names parse to `Feature::Other`
impl FromStr for Feature {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "alerts" => Feature::Alerts,
            "watchlist" => Feature::Watchlist,
            "all_symbols" => Feature::AllSymbols,
            "all_timeframes" => Feature::AllTimeframes,
            "api_access" => Feature::ApiAccess,
            "admin_dashboard" => Feature::AdminDashboard,
            "affiliate_dashboard" => Feature::AffiliateDashboard,
            "affiliate_codes" => Feature::AffiliateCodes,
            "commission_reports" => Feature::CommissionReports,
            other => Feature::Other(other.to_string()),
        })
    }
}

impl From<&str> for Feature {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(feature) => feature,
            Err(never) => match never {},
        }
    }
}

fn require_pro(tier: Tier, denial: &str) -> Decision {
    let decision = if tier.satisfies(Tier::Pro) {
        Decision::allow()
    } else {
        Decision::deny(DenialKind::Tier, denial)
    };
    decision.requiring_tier(Tier::Pro)
}

fn require_affiliate(user: &SessionUser, denial: &str) -> Decision {
    if user.is_affiliate {
        Decision::allow()
    } else {
        Decision::deny(DenialKind::Affiliate, denial)
    }
}

/// Decide whether `user` may use `feature`.
///
/// Role and tier are independent: an ADMIN on FREE is still denied PRO
/// features, and affiliate features depend on the affiliate flag alone.
pub fn evaluate_feature(policy: &TierPolicy, user: Option<&SessionUser>, feature: &Feature) -> Decision {
    let Some(user) = user else {
        return Decision::deny(DenialKind::Unauthenticated, "Authentication required").requiring_role(Role::User);
    };
    let tier = user.tier;

    match feature {
        Feature::AdminDashboard => {
            let decision = if user.role == Role::Admin {
                Decision::allow()
            } else {
                Decision::deny(DenialKind::Role, "Administrator access required")
            };
            decision.requiring_role(Role::Admin)
        }
        Feature::AllSymbols => require_pro(tier, "All symbols require PRO tier subscription"),
        Feature::AllTimeframes => require_pro(tier, "All timeframes require PRO tier subscription"),
        Feature::Alerts => Decision::allow_with_note(format!(
            "{} tier allows {} alerts maximum",
            tier,
            policy.alert_limit(tier)
        ))
        .requiring_tier(tier),
        Feature::Watchlist => Decision::allow_with_note(format!(
            "{} tier allows {} watchlist items maximum",
            tier,
            policy.watchlist_limit(tier)
        ))
        .requiring_tier(tier),
        Feature::ApiAccess => Decision::allow_with_note(format!(
            "{} tier: {} API requests per hour",
            tier,
            policy.rate_limit(tier)
        ))
        .requiring_tier(tier),
        Feature::AffiliateDashboard => require_affiliate(user, "Affiliate status required to access dashboard"),
        Feature::AffiliateCodes => require_affiliate(user, "Affiliate status required to access codes"),
        Feature::CommissionReports => require_affiliate(user, "Affiliate status required to view commissions"),
        Feature::Other(name) => {
            tracing::debug!(feature = %name, "unknown feature, allowing");
            Decision::allow_with_note("Unknown feature - defaulting to allowed")
        }
    }
}

/// Permission checks bound to the current session
#[derive(Clone)]
pub struct PermissionService<S> {
    policy: Arc<TierPolicy>,
    sessions: Sessions<S>,
}

impl<S: SessionProvider> PermissionService<S> {
    pub fn new(policy: Arc<TierPolicy>, provider: S) -> Self {
        Self {
            policy,
            sessions: Sessions::new(provider),
        }
    }

    async fn decide(&self, feature: &Feature) -> (Decision, Tier) {
        let user = self.sessions.get_user_session().await;
        let tier = user.as_ref().map(|u| u.tier).unwrap_or_default();
        (evaluate_feature(&self.policy, user.as_ref(), feature), tier)
    }

    pub async fn has_permission(&self, feature: impl Into<Feature>) -> PermissionCheckResult {
        let (decision, _) = self.decide(&feature.into()).await;
        decision.into()
    }

    /// `Ok(())` when allowed, the matching `AuthError` otherwise
    pub async fn check_permission(&self, feature: impl Into<Feature>) -> Result<(), AuthError> {
        let feature = feature.into();
        match self.decide(&feature).await {
            (Decision::Allowed(_), _) => Ok(()),
            (Decision::Denied(denial), tier) => {
                tracing::warn!(%feature, %tier, reason = %denial.reason, "permission denied");
                Err(AuthError::from_denial(denial, tier))
            }
        }
    }

    /// Deferred guard: each call re-reads the session and re-checks `feature`
    pub fn with_permission(
        &self,
        feature: impl Into<Feature>,
    ) -> impl Fn() -> BoxFuture<'static, Result<(), AuthError>>
    where
        S: Clone + 'static,
    {
        let service = self.clone();
        let feature = feature.into();
        move || {
            let service = service.clone();
            let feature = feature.clone();
            Box::pin(async move { service.check_permission(feature).await })
        }
    }

    pub async fn can_access_symbol(&self, symbol: &str) -> bool {
        let tier = self.sessions.get_user_tier().await;
        validation::can_access_symbol(&self.policy, tier, symbol)
    }

    pub async fn can_access_timeframe(&self, timeframe: &str) -> bool {
        let tier = self.sessions.get_user_tier().await;
        validation::can_access_timeframe(&self.policy, tier, timeframe)
    }

    pub async fn can_access_combination(&self, symbol: &str, timeframe: &str) -> bool {
        let tier = self.sessions.get_user_tier().await;
        validation::validate_chart_access(&self.policy, tier, symbol, timeframe).is_allowed()
    }

    pub async fn accessible_symbols(&self) -> Vec<String> {
        let tier = self.sessions.get_user_tier().await;
        self.policy.accessible_symbols(tier)
    }

    pub async fn accessible_timeframes(&self) -> Vec<String> {
        let tier = self.sessions.get_user_tier().await;
        self.policy.accessible_timeframes(tier)
    }

    pub async fn check_tier_limits(&self, resource: ResourceKind, current_count: u32) -> TierLimitCheck {
        let tier = self.sessions.get_user_tier().await;
        quota::check_tier_limits(&self.policy, tier, resource, current_count)
    }
}
