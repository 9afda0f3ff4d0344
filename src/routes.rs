// routes.rs - Router assembly
//
// Layer order (outermost first): CORS, trace (when request logging is on),
// tier gate, session.

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::{session_middleware, tier_gate_middleware};
use crate::state::AppState;

/// Full application router with CORS taken from the loaded config
pub fn app(state: AppState) -> Router {
    let config = crate::config::config();
    let router = router(state);
    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };
    router.layer(cors_layer(&config.security))
}

/// Routes and middleware minus the config-driven CORS and trace layers;
/// in-process tests drive this directly.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(access_routes())
        .merge(quota_routes())
        .merge(session_routes())
        .merge(gated_routes())
        .fallback(public::not_found)
        .layer(middleware::from_fn(session_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), tier_gate_middleware))
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/api/tiers", get(public::tiers_list))
        .route("/api/tiers/:tier", get(public::tiers_get))
}

fn access_routes() -> Router<AppState> {
    Router::new()
        .route("/api/access/symbol/:symbol", get(protected::access_symbol))
        .route("/api/access/timeframe/:timeframe", get(protected::access_timeframe))
        .route("/api/access/chart/:symbol/:timeframe", get(protected::access_chart))
        .route("/api/permissions/:feature", get(protected::permissions_get))
}

fn quota_routes() -> Router<AppState> {
    Router::new()
        .route("/api/limits/:resource", get(protected::limits_get))
        .route("/api/alerts/check", post(protected::alerts_check))
        .route("/api/watchlist/check", post(protected::watchlist_check))
}

fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/whoami", get(protected::whoami))
        .route("/api/affiliate/profile", get(protected::affiliate_profile))
        .route("/api/admin/policy", get(protected::admin_policy))
}

fn gated_routes() -> Router<AppState> {
    Router::new().route("/api/export/entitlements", get(protected::export_entitlements))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
