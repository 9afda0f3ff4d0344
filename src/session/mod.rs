// session/mod.rs - Session-aware authorization helpers
//
// `Sessions` wraps whatever produces the current session (a decoded request
// token, a test double) and answers identity questions about it. Provider
// failures are logged and treated as "no session".

pub mod affiliate;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AuthError;
use crate::tier::{Role, Tier};

pub use affiliate::{AffiliateProfile, AffiliateStatus, AffiliateStore, InMemoryAffiliateStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_affiliate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    pub expires: DateTime<Utc>,
}

impl Session {
    fn has_user(&self) -> bool {
        !self.user.id.is_empty()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session provider failed: {0}")]
    Provider(String),

    #[error("Affiliate store failed: {0}")]
    Store(String),
}

/// Source of the current session
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn session(&self) -> Result<Option<Session>, SessionError>;
}

/// Session already resolved for one request by `middleware::auth`
#[derive(Debug, Clone, Default)]
pub struct RequestSession(pub Option<Session>);

#[async_trait]
impl SessionProvider for RequestSession {
    async fn session(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.0.clone())
    }
}

const SIGN_IN_REQUIRED: &str = "You must be signed in to access this resource";
const ADMIN_REQUIRED: &str = "Administrator access required";
const AFFILIATE_REQUIRED: &str = "Affiliate status required to access this resource";

#[derive(Debug, Clone)]
pub struct Sessions<S> {
    provider: S,
}

impl<S: SessionProvider> Sessions<S> {
    pub fn new(provider: S) -> Self {
        Self { provider }
    }

    pub async fn get_session(&self) -> Option<Session> {
        match self.provider.session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Error getting session: {}", e);
                None
            }
        }
    }

    /// Session with a user, or `Unauthorized`
    pub async fn require_auth(&self) -> Result<Session, AuthError> {
        self.get_session()
            .await
            .filter(Session::has_user)
            .ok_or_else(|| AuthError::unauthorized(SIGN_IN_REQUIRED))
    }

    pub async fn get_user_session(&self) -> Option<SessionUser> {
        self.get_session()
            .await
            .filter(Session::has_user)
            .map(|s| s.user)
    }

    /// Signed-in user's tier, FREE otherwise
    pub async fn get_user_tier(&self) -> Tier {
        self.get_user_session().await.map(|u| u.tier).unwrap_or_default()
    }

    pub async fn get_user_role(&self) -> Role {
        self.get_user_session().await.map(|u| u.role).unwrap_or_default()
    }

    pub async fn is_admin(&self) -> bool {
        self.get_user_role().await == Role::Admin
    }

    pub async fn has_tier(&self, required: Tier) -> bool {
        self.get_user_tier().await.satisfies(required)
    }

    pub async fn require_admin(&self) -> Result<Session, AuthError> {
        let session = self.require_auth().await?;
        if session.user.role != Role::Admin {
            tracing::warn!(user = %session.user.id, "admin access denied");
            return Err(AuthError::forbidden(ADMIN_REQUIRED));
        }
        Ok(session)
    }

    pub async fn require_tier(&self, required: Tier) -> Result<Session, AuthError> {
        let session = self.require_auth().await?;
        let current = session.user.tier;
        if !current.satisfies(required) {
            tracing::warn!(user = %session.user.id, %current, %required, "tier access denied");
            return Err(AuthError::tier_access(
                format!("{} tier subscription required for this feature", required),
                required,
                current,
            ));
        }
        Ok(session)
    }

    pub async fn is_affiliate(&self) -> bool {
        self.get_user_session().await.is_some_and(|u| u.is_affiliate)
    }

    pub async fn require_affiliate(&self) -> Result<Session, AuthError> {
        let session = self.require_auth().await?;
        if !session.user.is_affiliate {
            return Err(AuthError::not_affiliate(AFFILIATE_REQUIRED));
        }
        Ok(session)
    }

    /// Profile for the signed-in affiliate; `None` when signed out, not an
    /// affiliate, or no profile exists.
    pub async fn get_affiliate_profile<A>(&self, store: &A) -> Result<Option<AffiliateProfile>, SessionError>
    where
        A: AffiliateStore + ?Sized,
    {
        match self.get_user_session().await {
            Some(user) if user.is_affiliate => store.find_by_user_id(&user.id).await,
            _ => Ok(None),
        }
    }
}
