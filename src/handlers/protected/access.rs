// handlers/protected/access.rs - GET /api/access/{symbol,timeframe,chart}
//
// Evaluated against the session tier (FREE when signed out). Denials are
// regular 200 responses with `allowed: false`.

use axum::extract::{Extension, Path, State};

use crate::middleware::{ApiResponse, ApiResult};
use crate::session::{RequestSession, Sessions};
use crate::state::AppState;
use crate::tier::{validation, ValidationResult};

/// GET /api/access/symbol/:symbol
pub async fn symbol(
    State(state): State<AppState>,
    Extension(session): Extension<RequestSession>,
    Path(symbol): Path<String>,
) -> ApiResult<ValidationResult> {
    let tier = Sessions::new(session).get_user_tier().await;
    let decision = validation::validate_tier_access(&state.policy, tier, &symbol);
    Ok(ApiResponse::success(decision.into()))
}

/// GET /api/access/timeframe/:timeframe
pub async fn timeframe(
    State(state): State<AppState>,
    Extension(session): Extension<RequestSession>,
    Path(timeframe): Path<String>,
) -> ApiResult<ValidationResult> {
    let tier = Sessions::new(session).get_user_tier().await;
    let decision = validation::validate_timeframe_access(&state.policy, tier, &timeframe);
    Ok(ApiResponse::success(decision.into()))
}

/// GET /api/access/chart/:symbol/:timeframe
pub async fn chart(
    State(state): State<AppState>,
    Extension(session): Extension<RequestSession>,
    Path((symbol, timeframe)): Path<(String, String)>,
) -> ApiResult<ValidationResult> {
    let tier = Sessions::new(session).get_user_tier().await;
    let decision = validation::validate_chart_access(&state.policy, tier, &symbol, &timeframe);
    Ok(ApiResponse::success(decision.into()))
}
