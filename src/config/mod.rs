use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::middleware::tier_check::GateRule;
use crate::tier::Tier;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub policy: PolicyConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    /// HS256 signing secret for session tokens; empty disables token auth
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// YAML tier table replacing the built-in defaults
    pub tier_config_path: Option<PathBuf>,
    pub gate_rules: Vec<GateRule>,
    /// Redirect target for tier-gated pages
    pub pricing_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub affiliate_seed_path: Option<PathBuf>,
}

/// Longest session token lifetime accepted from the environment (one year)
pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365;

fn parse_expiry_hours(raw: &str) -> Option<u64> {
    raw.trim().parse().ok().filter(|h| (1..=MAX_JWT_EXPIRY_HOURS).contains(h))
}

fn default_gate_rules() -> Vec<GateRule> {
    vec![GateRule::new("/api/export", Tier::Pro, "Data export")]
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("TIERGATE_PORT").or_else(|_| env::var("PORT")) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            match parse_expiry_hours(&v) {
                Some(hours) => self.security.jwt_expiry_hours = hours,
                None => tracing::warn!(
                    "Ignoring SECURITY_JWT_EXPIRY_HOURS={}: expected 1..={}",
                    v,
                    MAX_JWT_EXPIRY_HOURS
                ),
            }
        }

        // Policy overrides
        if let Ok(v) = env::var("POLICY_TIER_CONFIG_PATH") {
            self.policy.tier_config_path = Some(PathBuf::from(v)).filter(|p| !p.as_os_str().is_empty());
        }
        if let Ok(v) = env::var("POLICY_GATE_RULES") {
            match GateRule::parse_list(&v) {
                Ok(rules) => self.policy.gate_rules = rules,
                Err(e) => tracing::warn!("Ignoring POLICY_GATE_RULES: {}", e),
            }
        }
        if let Ok(v) = env::var("POLICY_PRICING_PATH") {
            self.policy.pricing_path = v;
        }

        // Store overrides
        if let Ok(v) = env::var("STORE_AFFILIATE_SEED_PATH") {
            self.store.affiliate_seed_path = Some(PathBuf::from(v)).filter(|p| !p.as_os_str().is_empty());
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: "tiergate-development-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
            policy: PolicyConfig {
                tier_config_path: None,
                gate_rules: default_gate_rules(),
                pricing_path: "/pricing".to_string(),
            },
            store: StoreConfig {
                affiliate_seed_path: None,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
            policy: PolicyConfig {
                tier_config_path: None,
                gate_rules: default_gate_rules(),
                pricing_path: "/pricing".to_string(),
            },
            store: StoreConfig {
                affiliate_seed_path: None,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                port: 8080,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
            },
            policy: PolicyConfig {
                tier_config_path: None,
                gate_rules: default_gate_rules(),
                pricing_path: "/pricing".to_string(),
            },
            store: StoreConfig {
                affiliate_seed_path: None,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

// Helper macros for common checks
#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.api.port, 3000);
        assert_eq!(config.policy.pricing_path, "/pricing");
        assert_eq!(config.policy.gate_rules, default_gate_rules());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert!(!config.api.enable_request_logging);
        assert_eq!(config.security.jwt_expiry_hours, 4);
    }

    #[test]
    fn test_expiry_hours_are_bounded() {
        assert_eq!(parse_expiry_hours("24"), Some(24));
        assert_eq!(parse_expiry_hours(" 8760 "), Some(MAX_JWT_EXPIRY_HOURS));
        assert_eq!(parse_expiry_hours("8761"), None);
        assert_eq!(parse_expiry_hours("18446744073709551615"), None);
        assert_eq!(parse_expiry_hours("0"), None);
        assert_eq!(parse_expiry_hours("-1"), None);
    }

    #[test]
    fn test_export_is_gated_by_default() {
        let rules = default_gate_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].prefix, "/api/export");
        assert_eq!(rules[0].required_tier, Tier::Pro);
    }
}
