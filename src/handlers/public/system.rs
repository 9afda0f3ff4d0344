// handlers/public/system.rs - GET /, GET /health and the 404 fallback

use axum::{extract::State, http::Uri, response::Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::tier::Tier;

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "tiergate-api",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Subscription tier access-control service",
        "endpoints": {
            "public": ["/", "/health", "/api/tiers", "/api/tiers/:tier"],
            "access": [
                "/api/access/symbol/:symbol",
                "/api/access/timeframe/:timeframe",
                "/api/access/chart/:symbol/:timeframe"
            ],
            "quota": ["/api/limits/:resource", "/api/alerts/check", "/api/watchlist/check"],
            "session": [
                "/api/permissions/:feature",
                "/api/auth/whoami",
                "/api/affiliate/profile",
                "/api/admin/policy"
            ],
            "gated": ["/api/export/entitlements"]
        }
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub tiers: Vec<Tier>,
    pub gate_rules: usize,
}

pub async fn health(State(state): State<AppState>) -> ApiResult<HealthStatus> {
    Ok(ApiResponse::success(HealthStatus {
        status: "ok",
        tiers: state.policy.iter().map(|(tier, _)| tier).collect(),
        gate_rules: state.gate_rules.len(),
    }))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
