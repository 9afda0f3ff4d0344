use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{decode_jwt, JwtError};
use crate::error::ApiError;
use crate::session::{RequestSession, Session};

/// Resolves the bearer token (if any) into a `RequestSession` extension.
///
/// No `Authorization` header means an anonymous request; a header that is
/// present but unusable is rejected with 401.
pub async fn session_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let session = match extract_jwt_from_headers(request.headers()).map_err(ApiError::unauthorized)? {
        None => None,
        Some(token) => {
            let claims = decode_jwt(token).map_err(reject_token)?;
            Some(Session::from(claims))
        }
    };

    request.extensions_mut().insert(RequestSession(session));
    Ok(next.run(request).await)
}

/// A missing signing secret is a server fault; anything else is the caller's token
fn reject_token(err: JwtError) -> ApiError {
    tracing::warn!("Rejected session token: {}", err);
    match err {
        JwtError::InvalidSecret => ApiError::internal_server_error("Session tokens are not configured"),
        other => ApiError::unauthorized(other.to_string()),
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<&str>, String> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if token.trim().is_empty() => Err("Empty JWT token".to_string()),
        Some(token) => Ok(Some(token.trim())),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}
