// testing/mod.rs - Fixtures shared by the unit test modules

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::session::{Session, SessionError, SessionProvider, SessionUser};
use crate::tier::{Role, Tier};

pub fn user(tier: Tier, role: Role) -> SessionUser {
    SessionUser {
        id: "user123".to_string(),
        email: "test@example.com".to_string(),
        name: Some("Test User".to_string()),
        tier,
        role,
        is_affiliate: false,
    }
}

pub fn session(tier: Tier, role: Role, is_affiliate: bool) -> Session {
    let mut user = user(tier, role);
    user.is_affiliate = is_affiliate;
    Session {
        user,
        expires: Utc::now() + Duration::hours(24),
    }
}

/// Provider returning a fixed session, or failing on every call
#[derive(Debug, Clone)]
pub struct MockSessionProvider {
    session: Option<Session>,
    fail: bool,
}

impl MockSessionProvider {
    pub fn with(session: Session) -> Self {
        Self { session: Some(session), fail: false }
    }

    pub fn signed_out() -> Self {
        Self { session: None, fail: false }
    }

    pub fn failing() -> Self {
        Self { session: None, fail: true }
    }
}

#[async_trait]
impl SessionProvider for MockSessionProvider {
    async fn session(&self) -> Result<Option<Session>, SessionError> {
        if self.fail {
            return Err(SessionError::Provider("session lookup failed".to_string()));
        }
        Ok(self.session.clone())
    }
}
