// handlers/protected/limits.rs - Quota meters and pre-create checks

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    Json,
};
use serde::Deserialize;

use crate::middleware::{ApiResponse, ApiResult};
use crate::permissions::PermissionService;
use crate::session::{RequestSession, Sessions};
use crate::state::AppState;
use crate::tier::quota::{self, TierLimitCheck};
use crate::tier::ValidationResult;
use crate::types::ResourceKind;

#[derive(Debug, Deserialize)]
pub struct LimitsQuery {
    /// Items the caller already has; defaults to 0
    pub current: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaCheckRequest {
    pub current_count: u32,
}

/// GET /api/limits/:resource?current=N
pub async fn get(
    State(state): State<AppState>,
    Extension(session): Extension<RequestSession>,
    Path(resource): Path<String>,
    query: Result<Query<LimitsQuery>, QueryRejection>,
) -> ApiResult<TierLimitCheck> {
    let Query(query) = query?;
    let resource: ResourceKind = resource.parse()?;
    let service = PermissionService::new(state.policy.clone(), session);
    let check = service.check_tier_limits(resource, query.current.unwrap_or(0)).await;
    Ok(ApiResponse::success(check))
}

/// POST /api/alerts/check
pub async fn alerts_check(
    State(state): State<AppState>,
    Extension(session): Extension<RequestSession>,
    body: Result<Json<QuotaCheckRequest>, JsonRejection>,
) -> ApiResult<ValidationResult> {
    let Json(body) = body?;
    let tier = Sessions::new(session).get_user_tier().await;
    let decision = quota::can_create_alert(&state.policy, tier, body.current_count);
    Ok(ApiResponse::success(decision.into()))
}

/// POST /api/watchlist/check
pub async fn watchlist_check(
    State(state): State<AppState>,
    Extension(session): Extension<RequestSession>,
    body: Result<Json<QuotaCheckRequest>, JsonRejection>,
) -> ApiResult<ValidationResult> {
    let Json(body) = body?;
    let tier = Sessions::new(session).get_user_tier().await;
    let decision = quota::can_add_watchlist_item(&state.policy, tier, body.current_count);
    Ok(ApiResponse::success(decision.into()))
}
