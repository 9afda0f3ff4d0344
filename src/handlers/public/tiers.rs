// handlers/public/tiers.rs - GET /api/tiers and GET /api/tiers/:tier

use axum::extract::{Path, State};

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::tier::helpers::{summarize, TierSummary};
use crate::tier::Tier;

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<TierSummary>> {
    let tiers = state
        .policy
        .iter()
        .map(|(tier, _)| summarize(&state.policy, tier))
        .collect();
    Ok(ApiResponse::success(tiers))
}

pub async fn get(State(state): State<AppState>, Path(tier): Path<String>) -> ApiResult<TierSummary> {
    let tier: Tier = tier.parse()?;
    Ok(ApiResponse::success(summarize(&state.policy, tier)))
}
