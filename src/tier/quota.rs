//! Per-resource numeric quotas (alerts, watchlist items).
//!
//! Two result shapes exist: `can_create_alert` / `can_add_watchlist_item`
//! return a `Decision` with an upgrade message, `check_tier_limits` returns
//! counts for usage meters. Both read the same limits.

use serde::{Deserialize, Serialize};

use super::{Decision, DenialKind, Tier, TierPolicy};
use crate::types::ResourceKind;

/// Usage meter for one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierLimitCheck {
    pub can_create: bool,
    pub remaining: u32,
    pub limit: u32,
}

pub fn limit_for(policy: &TierPolicy, tier: Tier, resource: ResourceKind) -> u32 {
    match resource {
        ResourceKind::Alerts => policy.alert_limit(tier),
        ResourceKind::Watchlist => policy.watchlist_limit(tier),
    }
}

fn quota_decision(
    policy: &TierPolicy,
    tier: Tier,
    resource: ResourceKind,
    current: u32,
) -> Decision {
    let limit = limit_for(policy, tier, resource);
    if current < limit {
        return Decision::allow();
    }

    let (label, noun) = match resource {
        ResourceKind::Alerts => ("Alert", "alerts"),
        ResourceKind::Watchlist => ("Watchlist", "watchlist items"),
    };
    let pro_limit = limit_for(policy, Tier::Pro, resource);
    let reason = match tier {
        Tier::Pro => format!(
            "{} limit reached ({}). PRO tier allows up to {} {}.",
            label, limit, pro_limit, noun
        ),
        Tier::Free => format!(
            "{} limit reached ({}). Upgrade to PRO for up to {} {}.",
            label, limit, pro_limit, noun
        ),
    };

    tracing::debug!(%tier, %resource, current, limit, "quota reached");
    Decision::deny(DenialKind::Quota, reason).requiring_tier(Tier::Pro)
}

/// Allowed iff `current_count < alert_limit(tier)`
pub fn can_create_alert(policy: &TierPolicy, tier: Tier, current_count: u32) -> Decision {
    quota_decision(policy, tier, ResourceKind::Alerts, current_count)
}

pub fn can_add_watchlist_item(policy: &TierPolicy, tier: Tier, current_count: u32) -> Decision {
    quota_decision(policy, tier, ResourceKind::Watchlist, current_count)
}

pub fn check_tier_limits(
    policy: &TierPolicy,
    tier: Tier,
    resource: ResourceKind,
    current_count: u32,
) -> TierLimitCheck {
    let limit = limit_for(policy, tier, resource);
    TierLimitCheck {
        can_create: current_count < limit,
        remaining: limit.saturating_sub(current_count),
        limit,
    }
}
