// middleware/tier_check.rs - Edge tier gate driven by cookies / headers
//
// Reads the tier from the `user-tier` cookie (only alongside a session
// cookie) or the `x-user-tier` header. This is a routing shortcut for pages
// and coarse API prefixes; handlers that need a trusted tier use the bearer
// session from `middleware::auth`.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::state::AppState;
use crate::tier::{validation, Decision, PolicyError, Tier, TierPolicy};

pub const SESSION_COOKIES: [&str; 4] = [
    "next-auth.session-token",
    "__Secure-next-auth.session-token",
    "session-token",
    "__Secure-session-token",
];
pub const TIER_COOKIE: &str = "user-tier";
pub const TIER_HEADER: &str = "x-user-tier";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCheckResult {
    pub allowed: bool,
    pub tier: Tier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Path prefix that requires a minimum tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateRule {
    pub prefix: String,
    pub required_tier: Tier,
    /// Human name used in the denial message
    pub resource: String,
}

impl GateRule {
    pub fn new(prefix: impl Into<String>, required_tier: Tier, resource: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            required_tier,
            resource: resource.into(),
        }
    }

    /// Parse `prefix=TIER:resource;prefix=TIER:resource`
    pub fn parse_list(raw: &str) -> Result<Vec<GateRule>, PolicyError> {
        raw.split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let invalid = || PolicyError::InvalidGateRule(entry.to_string());
                let (prefix, rest) = entry.split_once('=').ok_or_else(invalid)?;
                let (tier, resource) = rest.split_once(':').ok_or_else(invalid)?;
                if !prefix.trim().starts_with('/') || resource.trim().is_empty() {
                    return Err(invalid());
                }
                Ok(GateRule::new(prefix.trim(), tier.trim().parse()?, resource.trim()))
            })
            .collect()
    }
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

/// Session cookie + valid tier cookie, else valid tier header, else FREE
pub fn extract_tier_from_request(headers: &HeaderMap) -> Tier {
    let has_session = SESSION_COOKIES.iter().any(|name| cookie_value(headers, name).is_some());
    if has_session {
        if let Some(tier) = cookie_value(headers, TIER_COOKIE).and_then(|v| v.parse().ok()) {
            return tier;
        }
    }

    headers
        .get(TIER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_default()
}

pub fn check_tier_access(headers: &HeaderMap, required: Tier, resource: &str) -> TierCheckResult {
    let tier = extract_tier_from_request(headers);
    if tier.satisfies(required) {
        return TierCheckResult { allowed: true, tier, reason: None };
    }
    TierCheckResult {
        allowed: false,
        tier,
        reason: Some(format!("{} requires {} tier.", resource, required)),
    }
}

fn from_check(tier: Tier, allowed: bool, reason: impl FnOnce() -> String) -> TierCheckResult {
    TierCheckResult {
        allowed,
        tier,
        reason: (!allowed).then(reason),
    }
}

pub fn check_symbol_access(policy: &TierPolicy, headers: &HeaderMap, symbol: &str) -> TierCheckResult {
    let tier = extract_tier_from_request(headers);
    let allowed = validation::can_access_symbol(policy, tier, symbol);
    from_check(tier, allowed, || {
        format!("Symbol {} is not available in your {} tier.", symbol, tier)
    })
}

/// Validator reason when it gives one, generic text otherwise
fn from_decision(tier: Tier, decision: Decision, fallback: impl FnOnce() -> String) -> TierCheckResult {
    let allowed = decision.is_allowed();
    let reason = decision.reason().map(str::to_owned);
    TierCheckResult {
        allowed,
        tier,
        reason: (!allowed).then(|| reason.unwrap_or_else(fallback)),
    }
}

pub fn check_timeframe_access(policy: &TierPolicy, headers: &HeaderMap, timeframe: &str) -> TierCheckResult {
    let tier = extract_tier_from_request(headers);
    let decision = validation::validate_timeframe_access(policy, tier, timeframe);
    from_decision(tier, decision, || {
        format!("Timeframe {} is not available in your {} tier.", timeframe, tier)
    })
}

/// Symbol first, so a symbol denial keeps its own reason
pub fn check_chart_access(policy: &TierPolicy, headers: &HeaderMap, symbol: &str, timeframe: &str) -> TierCheckResult {
    let tier = extract_tier_from_request(headers);
    let decision = validation::validate_chart_access(policy, tier, symbol, timeframe);
    from_decision(tier, decision, || {
        format!("Chart {}/{} is not available in your {} tier.", symbol, timeframe, tier)
    })
}

pub fn is_pro_user(headers: &HeaderMap) -> bool {
    extract_tier_from_request(headers) == Tier::Pro
}

pub fn is_free_user(headers: &HeaderMap) -> bool {
    extract_tier_from_request(headers) == Tier::Free
}

/// First matching prefix rule decides. API paths get a 403 JSON body,
/// everything else is redirected to the pricing page.
pub async fn tier_gate_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let Some(rule) = state.gate_rules.iter().find(|r| path.starts_with(&r.prefix)) else {
        return next.run(request).await;
    };

    let check = check_tier_access(request.headers(), rule.required_tier, &rule.resource);
    if check.allowed {
        return next.run(request).await;
    }

    let reason = check.reason.unwrap_or_default();
    tracing::warn!(path = %path, tier = %check.tier, required = %rule.required_tier, "tier gate denied");

    if path.starts_with("/api/") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "success": false,
                "error": "Tier restriction",
                "message": reason,
                "currentTier": check.tier,
                "requiredTier": rule.required_tier,
            })),
        )
            .into_response();
    }

    let encoded: String = url::form_urlencoded::byte_serialize(reason.as_bytes()).collect();
    Redirect::temporary(&format!("{}?reason={}", state.pricing_path, encoded)).into_response()
}
