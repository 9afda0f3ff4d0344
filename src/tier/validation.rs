//! Symbol and timeframe access checks.

use super::{Decision, DenialKind, PolicyError, Tier, TierPolicy};

fn upgrade_hint(tier: Tier) -> Tier {
    tier.upgrade_target().unwrap_or(tier)
}

/// Can `tier` chart `symbol`? Exact, case-sensitive match.
pub fn validate_tier_access(policy: &TierPolicy, tier: Tier, symbol: &str) -> Decision {
    if policy.available_symbols(tier).permits(symbol) {
        return Decision::allow();
    }

    let target = upgrade_hint(tier);
    tracing::debug!(%tier, symbol, "symbol denied");
    Decision::deny(
        DenialKind::Tier,
        format!("Symbol {} requires {} tier. Please upgrade.", symbol, target),
    )
    .requiring_tier(target)
}

/// String entry point for callers holding an unparsed tier; an unknown tier
/// is an error rather than a denial.
pub fn validate_tier_access_str(
    policy: &TierPolicy,
    tier: &str,
    symbol: &str,
) -> Result<Decision, PolicyError> {
    let tier: Tier = tier.parse()?;
    Ok(validate_tier_access(policy, tier, symbol))
}

pub fn validate_timeframe_access(policy: &TierPolicy, tier: Tier, timeframe: &str) -> Decision {
    if policy.available_timeframes(tier).permits(timeframe) {
        return Decision::allow();
    }

    let target = upgrade_hint(tier);
    tracing::debug!(%tier, timeframe, "timeframe denied");
    Decision::deny(
        DenialKind::Tier,
        format!("Timeframe {} requires {} tier. Please upgrade.", timeframe, target),
    )
    .requiring_tier(target)
}

/// Symbol is checked first; a symbol denial is returned as-is and the
/// timeframe is not examined.
pub fn validate_chart_access(
    policy: &TierPolicy,
    tier: Tier,
    symbol: &str,
    timeframe: &str,
) -> Decision {
    validate_tier_access(policy, tier, symbol)
        .and_then(|| validate_timeframe_access(policy, tier, timeframe))
}

pub fn can_access_symbol(policy: &TierPolicy, tier: Tier, symbol: &str) -> bool {
    validate_tier_access(policy, tier, symbol).is_allowed()
}

pub fn can_access_timeframe(policy: &TierPolicy, tier: Tier, timeframe: &str) -> bool {
    validate_timeframe_access(policy, tier, timeframe).is_allowed()
}
