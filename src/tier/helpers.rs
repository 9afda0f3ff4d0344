//! Display and upgrade helpers built on the policy table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::policy::TIMEFRAME_LABELS;
use super::validation::{can_access_symbol, can_access_timeframe};
use super::{Tier, TierConfig, TierPolicy};

/// What moving from one tier to another adds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierUpgradeInfo {
    pub current_tier: Tier,
    pub target_tier: Tier,
    pub additional_symbols: u32,
    pub additional_timeframes: u32,
    pub additional_alerts: u32,
    pub additional_watchlist_items: u32,
    pub price_per_month: Decimal,
}

/// Both the symbol and the timeframe must be permitted
pub fn has_chart_access(policy: &TierPolicy, tier: Tier, symbol: &str, timeframe: &str) -> bool {
    can_access_symbol(policy, tier, symbol) && can_access_timeframe(policy, tier, timeframe)
}

/// Number of symbol x timeframe pairs, `None` when either side is a wildcard
pub fn chart_combinations(policy: &TierPolicy, tier: Tier) -> Option<usize> {
    let symbols = policy.available_symbols(tier).len()?;
    let timeframes = policy.available_timeframes(tier).len()?;
    Some(symbols * timeframes)
}

pub fn display_name(policy: &TierPolicy, tier: Tier) -> &str {
    &policy.get(tier).display_name
}

pub fn can_upgrade(current: Tier, target: Tier) -> bool {
    target > current
}

pub fn upgrade_path(tier: Tier) -> Vec<Tier> {
    Tier::ALL.into_iter().filter(|t| *t > tier).collect()
}

pub fn upgrade_info(policy: &TierPolicy, current: Tier, target: Tier) -> Option<TierUpgradeInfo> {
    if !can_upgrade(current, target) {
        return None;
    }

    let from = policy.get(current);
    let to = policy.get(target);
    let listed = |tier: Tier, symbols: bool| -> u32 {
        let count = if symbols {
            policy.accessible_symbols(tier).len()
        } else {
            policy.accessible_timeframes(tier).len()
        };
        u32::try_from(count).unwrap_or(u32::MAX)
    };

    Some(TierUpgradeInfo {
        current_tier: current,
        target_tier: target,
        additional_symbols: listed(target, true).saturating_sub(listed(current, true)),
        additional_timeframes: listed(target, false).saturating_sub(listed(current, false)),
        additional_alerts: to.max_alerts.saturating_sub(from.max_alerts),
        additional_watchlist_items: to.max_watchlist_items.saturating_sub(from.max_watchlist_items),
        price_per_month: to.price_usd,
    })
}

/// One tier's entitlements plus the derived display data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSummary {
    pub tier: Tier,
    #[serde(flatten)]
    pub config: TierConfig,
    /// `null` when either set is unlimited
    pub chart_combinations: Option<usize>,
    pub accessible_symbols: Vec<String>,
    pub accessible_timeframes: Vec<String>,
    pub upgrade_path: Vec<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_upgrade: Option<TierUpgradeInfo>,
}

pub fn summarize(policy: &TierPolicy, tier: Tier) -> TierSummary {
    TierSummary {
        tier,
        config: policy.get(tier).clone(),
        chart_combinations: chart_combinations(policy, tier),
        accessible_symbols: policy.accessible_symbols(tier),
        accessible_timeframes: policy.accessible_timeframes(tier),
        upgrade_path: upgrade_path(tier),
        next_upgrade: tier
            .upgrade_target()
            .and_then(|target| upgrade_info(policy, tier, target)),
    }
}

pub fn timeframe_label(code: &str) -> Option<&'static str> {
    TIMEFRAME_LABELS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}
