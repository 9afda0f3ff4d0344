// handlers/protected/permissions.rs - GET /api/permissions/:feature

use axum::extract::{Extension, Path, State};

use crate::middleware::{ApiResponse, ApiResult};
use crate::permissions::{Feature, PermissionService};
use crate::session::RequestSession;
use crate::state::AppState;
use crate::tier::PermissionCheckResult;

pub async fn get(
    State(state): State<AppState>,
    Extension(session): Extension<RequestSession>,
    Path(feature): Path<String>,
) -> ApiResult<PermissionCheckResult> {
    let service = PermissionService::new(state.policy.clone(), session);
    let result = service.has_permission(Feature::from(feature.as_str())).await;
    Ok(ApiResponse::success(result))
}
