// auth/mod.rs - Session tokens and authorization errors
//
// A session travels as an HS256 JWT whose claims carry the user's tier,
// role and affiliate flag. `middleware::auth` decodes it into a `Session`.

pub mod error;

use chrono::{TimeDelta, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::session::{Session, SessionUser};
use crate::tier::{Role, Tier};

pub use error::AuthError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_affiliate: bool,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Claims expiring after the configured `jwt_expiry_hours`
    pub fn new(user: &SessionUser) -> Result<Self, JwtError> {
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let hours = i64::try_from(expiry_hours)
            .map_err(|_| JwtError::TokenGeneration(format!("expiry of {} hours is out of range", expiry_hours)))?;
        Self::with_expiry_hours(user, hours)
    }

    pub fn with_expiry_hours(user: &SessionUser, hours: i64) -> Result<Self, JwtError> {
        let ttl = TimeDelta::try_hours(hours)
            .ok_or_else(|| JwtError::TokenGeneration(format!("expiry of {} hours is out of range", hours)))?;
        Self::with_expiry(user, ttl)
    }

    pub fn with_expiry(user: &SessionUser, ttl: TimeDelta) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::TokenGeneration("token expiry overflows the calendar".to_string()))?;
        Ok(Self {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            tier: user.tier,
            role: user.role,
            is_affiliate: user.is_affiliate,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        let expires = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or_else(Utc::now);

        Session {
            user: SessionUser {
                id: claims.sub,
                email: claims.email,
                name: claims.name,
                tier: claims.tier,
                role: claims.role,
                is_affiliate: claims.is_affiliate,
            },
            expires,
        }
    }
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,
}

fn secret() -> Result<&'static str, JwtError> {
    let secret = config::config().security.jwt_secret.as_str();
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }
    Ok(secret)
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let encoding_key = EncodingKey::from_secret(secret()?.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry, returning the claims
pub fn decode_jwt(token: &str) -> Result<Claims, JwtError> {
    let decoding_key = DecodingKey::from_secret(secret()?.as_bytes());

    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::user;

    #[test]
    fn token_round_trip_keeps_entitlements() {
        let mut u = user(Tier::Pro, Role::Admin);
        u.is_affiliate = true;

        let token = generate_jwt(&Claims::new(&u).unwrap()).unwrap();
        let session: Session = decode_jwt(&token).unwrap().into();

        assert_eq!(session.user, u);
        assert!(session.expires > Utc::now());
    }

    #[test]
    fn expired_token_is_rejected() {
        let u = user(Tier::Free, Role::User);
        let token = generate_jwt(&Claims::with_expiry_hours(&u, -2).unwrap()).unwrap();
        assert!(matches!(decode_jwt(&token), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let u = user(Tier::Free, Role::User);
        let token = generate_jwt(&Claims::new(&u).unwrap()).unwrap();
        let tampered = format!("{}x", token);
        assert!(decode_jwt(&tampered).is_err());
    }

    #[test]
    fn out_of_range_expiry_is_an_error() {
        let u = user(Tier::Pro, Role::User);
        assert!(matches!(
            Claims::with_expiry_hours(&u, 9_999_999_999_999),
            Err(JwtError::TokenGeneration(_))
        ));
        assert!(matches!(
            Claims::with_expiry_hours(&u, i64::MAX / 1000),
            Err(JwtError::TokenGeneration(_))
        ));
        assert!(matches!(Claims::with_expiry(&u, TimeDelta::MAX), Err(JwtError::TokenGeneration(_))));

        let claims = Claims::with_expiry_hours(&u, 1).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn missing_entitlement_claims_default_to_free_user() {
        let json = serde_json::json!({
            "sub": "u1",
            "email": "a@b.c",
            "exp": 0,
            "iat": 0
        });
        let claims: Claims = serde_json::from_value(json).unwrap();
        assert_eq!(claims.tier, Tier::Free);
        assert_eq!(claims.role, Role::User);
        assert!(!claims.is_affiliate);
    }
}
