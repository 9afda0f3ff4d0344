use thiserror::Error;

use super::Tier;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Invalid tier: {0}. Valid tiers are: FREE, PRO")]
    InvalidTier(String),

    #[error("Invalid role: {0}. Valid roles are: USER, ADMIN")]
    InvalidRole(String),

    #[error("Invalid resource: {0}. Valid resources are: alerts, watchlist")]
    InvalidResource(String),

    #[error("Invalid gate rule: {0}. Expected prefix=TIER:resource")]
    InvalidGateRule(String),

    #[error("Tier {tier} has an empty allowed {kind} set")]
    EmptyAllowedSet { tier: Tier, kind: &'static str },

    #[error("Tier {0} is missing from the policy file")]
    MissingTier(Tier),

    #[error("Failed to read policy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse policy file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
