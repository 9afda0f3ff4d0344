use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffiliateStatus {
    #[default]
    Active,
    Pending,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateProfile {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Referral code handed out by the affiliate
    pub code: String,
    /// Fraction of each referred payment, e.g. 0.20
    #[serde(default = "default_commission_rate")]
    pub commission_rate: Decimal,
    #[serde(default)]
    pub status: AffiliateStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_commission_rate() -> Decimal {
    Decimal::new(20, 2)
}

impl AffiliateProfile {
    pub fn new(user_id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            full_name: None,
            country: None,
            code: code.into(),
            commission_rate: default_commission_rate(),
            status: AffiliateStatus::default(),
            created_at: Utc::now(),
        }
    }
}

/// Lookup of affiliate profiles by owning user
#[async_trait]
pub trait AffiliateStore: Send + Sync {
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<AffiliateProfile>, SessionError>;
}

#[async_trait]
impl<T: AffiliateStore + ?Sized> AffiliateStore for Arc<T> {
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<AffiliateProfile>, SessionError> {
        (**self).find_by_user_id(user_id).await
    }
}

/// Process-local store, optionally seeded from a JSON array of profiles
#[derive(Debug, Default)]
pub struct InMemoryAffiliateStore {
    profiles: RwLock<HashMap<String, AffiliateProfile>>,
}

impl InMemoryAffiliateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: impl IntoIterator<Item = AffiliateProfile>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|p| (p.user_id.clone(), p))
            .collect();
        Self { profiles: RwLock::new(profiles) }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SessionError::Store(format!("{}: {}", path.display(), e)))?;
        let profiles: Vec<AffiliateProfile> = serde_json::from_str(&raw)
            .map_err(|e| SessionError::Store(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Loaded {} affiliate profiles from {}", profiles.len(), path.display());
        Ok(Self::with_profiles(profiles))
    }

    /// Insert or replace the profile for its user
    pub async fn insert(&self, profile: AffiliateProfile) {
        self.profiles.write().await.insert(profile.user_id.clone(), profile);
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }
}

#[async_trait]
impl AffiliateStore for InMemoryAffiliateStore {
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<AffiliateProfile>, SessionError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }
}
