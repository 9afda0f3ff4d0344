// HTTP API Error Types
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::session::SessionError;
use crate::tier::{PolicyError, Tier};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden { code: &'static str, message: String },
    TierRestricted { message: String, required_tier: Tier, current_tier: Tier },

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden { .. } => 403,
            ApiError::TierRestricted { .. } => 403,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden { message, .. } => message,
            ApiError::TierRestricted { message, .. } => message,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::TierRestricted { message, required_tier, current_tier } => json!({
                "success": false,
                "error": message,
                "code": self.error_code(),
                "requiredTier": required_tier,
                "currentTier": current_tier
            }),
            _ => json!({
                "success": false,
                "error": self.message(),
                "code": self.error_code()
            }),
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden { code, .. } => code,
            ApiError::TierRestricted { .. } => "TIER_ACCESS_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

// Convert other error types to ApiError
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            AuthError::Forbidden { code, message } => ApiError::Forbidden { code, message },
            AuthError::TierAccess { message, required_tier, current_tier } => {
                ApiError::TierRestricted { message, required_tier, current_tier }
            }
        }
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::InvalidTier(_)
            | PolicyError::InvalidRole(_)
            | PolicyError::InvalidResource(_)
            | PolicyError::InvalidGateRule(_) => ApiError::bad_request(err.to_string()),
            other => {
                tracing::error!("Policy error: {}", other);
                ApiError::internal_server_error("Tier policy is misconfigured")
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        tracing::error!("Session error: {}", err);
        ApiError::internal_server_error("Unable to validate access")
    }
}

// Malformed query strings and bodies keep the JSON error envelope
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_keep_their_codes() {
        let err = ApiError::from(AuthError::not_affiliate("Affiliate status required to access this resource"));
        assert_eq!(err.status_code(), 403);
        assert_eq!(
            err.to_json(),
            json!({
                "success": false,
                "error": "Affiliate status required to access this resource",
                "code": "NOT_AFFILIATE"
            })
        );

        let err = ApiError::from(AuthError::tier_access("PRO tier subscription required for this feature", Tier::Pro, Tier::Free));
        let body = err.to_json();
        assert_eq!(body["code"], "TIER_ACCESS_ERROR");
        assert_eq!(body["requiredTier"], "PRO");
        assert_eq!(body["currentTier"], "FREE");
    }

    #[test]
    fn invalid_tier_is_a_bad_request() {
        let err = ApiError::from(PolicyError::InvalidTier("GOLD".to_string()));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Invalid tier: GOLD. Valid tiers are: FREE, PRO");
    }

    #[test]
    fn store_failures_are_opaque() {
        let err = ApiError::from(SessionError::Store("connection refused".to_string()));
        assert_eq!(err.status_code(), 500);
        assert!(!err.message().contains("connection refused"));
    }
}
