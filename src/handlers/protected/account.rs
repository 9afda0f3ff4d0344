// handlers/protected/account.rs - Session-required endpoints

use axum::extract::{Extension, State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, GateRule};
use crate::session::{AffiliateProfile, RequestSession, SessionUser, Sessions};
use crate::state::AppState;
use crate::tier::{Tier, TierConfig};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoAmI {
    pub user: SessionUser,
    pub expires: DateTime<Utc>,
    pub entitlements: TierConfig,
}

/// GET /api/auth/whoami
pub async fn whoami(
    State(state): State<AppState>,
    Extension(session): Extension<RequestSession>,
) -> ApiResult<WhoAmI> {
    let session = Sessions::new(session).require_auth().await?;
    let entitlements = state.policy.get(session.user.tier).clone();
    Ok(ApiResponse::success(WhoAmI {
        user: session.user,
        expires: session.expires,
        entitlements,
    }))
}

/// GET /api/affiliate/profile
pub async fn affiliate_profile(
    State(state): State<AppState>,
    Extension(session): Extension<RequestSession>,
) -> ApiResult<AffiliateProfile> {
    let sessions = Sessions::new(session);
    sessions.require_affiliate().await?;
    let profile = sessions
        .get_affiliate_profile(state.affiliates.as_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Affiliate profile not found"))?;
    Ok(ApiResponse::success(profile))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDump {
    pub tiers: BTreeMap<Tier, TierConfig>,
    pub gate_rules: Vec<GateRule>,
    pub pricing_path: String,
}

/// GET /api/admin/policy
pub async fn admin_policy(
    State(state): State<AppState>,
    Extension(session): Extension<RequestSession>,
) -> ApiResult<PolicyDump> {
    let session = Sessions::new(session).require_admin().await?;
    tracing::info!(user = %session.user.id, "policy table read");

    Ok(ApiResponse::success(PolicyDump {
        tiers: state.policy.iter().map(|(tier, cfg)| (tier, cfg.clone())).collect(),
        gate_rules: state.gate_rules.to_vec(),
        pricing_path: state.pricing_path.to_string(),
    }))
}
