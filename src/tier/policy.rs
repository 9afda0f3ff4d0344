use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::{Allowed, PolicyError, Tier};

/// FREE tier symbols
pub const FREE_SYMBOLS: [&str; 5] = [
    "BTCUSD", // Crypto - Bitcoin
    "EURUSD", // Forex major
    "USDJPY", // Forex major
    "US30",   // Index - Dow Jones
    "XAUUSD", // Commodity - Gold
];

/// Symbols only PRO accounts can chart
pub const PRO_EXCLUSIVE_SYMBOLS: [&str; 10] = [
    "AUDJPY", "AUDUSD", "ETHUSD", "GBPJPY", "GBPUSD", "NDX100", "NZDUSD", "USDCAD", "USDCHF",
    "XAGUSD",
];

/// Full symbol catalog, FREE symbols first
pub const SYMBOL_CATALOG: [&str; 15] = [
    "BTCUSD", "EURUSD", "USDJPY", "US30", "XAUUSD", "AUDJPY", "AUDUSD", "ETHUSD", "GBPJPY",
    "GBPUSD", "NDX100", "NZDUSD", "USDCAD", "USDCHF", "XAGUSD",
];

pub const FREE_TIMEFRAMES: [&str; 3] = ["H1", "H4", "D1"];

pub const PRO_EXCLUSIVE_TIMEFRAMES: [&str; 6] = ["M5", "M15", "M30", "H2", "H8", "H12"];

/// Full timeframe catalog, FREE timeframes first
pub const TIMEFRAME_CATALOG: [&str; 9] = ["H1", "H4", "D1", "M5", "M15", "M30", "H2", "H8", "H12"];

pub const TIMEFRAME_LABELS: [(&str, &str); 9] = [
    ("M5", "5 Minutes"),
    ("M15", "15 Minutes"),
    ("M30", "30 Minutes"),
    ("H1", "1 Hour"),
    ("H2", "2 Hours"),
    ("H4", "4 Hours"),
    ("H8", "8 Hours"),
    ("H12", "12 Hours"),
    ("D1", "1 Day"),
];

/// Boolean feature switches per tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierFeatures {
    pub advanced_charts: bool,
    pub export_data: bool,
    pub api_access: bool,
    pub priority_support: bool,
}

/// Entitlements for a single tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierConfig {
    pub display_name: String,
    /// Monthly price in USD
    pub price_usd: Decimal,
    pub max_symbols: u32,
    pub allowed_symbols: Allowed,
    pub allowed_timeframes: Allowed,
    pub max_alerts: u32,
    pub max_watchlist_items: u32,
    /// Requests per hour
    pub rate_limit: u32,
    pub features: TierFeatures,
}

impl TierConfig {
    pub fn free() -> Self {
        Self {
            display_name: "Free".to_string(),
            price_usd: Decimal::ZERO,
            max_symbols: 5,
            allowed_symbols: Allowed::only(FREE_SYMBOLS),
            allowed_timeframes: Allowed::only(FREE_TIMEFRAMES),
            max_alerts: 5,
            max_watchlist_items: 5,
            rate_limit: 60,
            features: TierFeatures {
                advanced_charts: false,
                export_data: false,
                api_access: false,
                priority_support: false,
            },
        }
    }

    pub fn pro() -> Self {
        Self {
            display_name: "Pro".to_string(),
            price_usd: Decimal::new(29, 0),
            max_symbols: 15,
            allowed_symbols: Allowed::All,
            allowed_timeframes: Allowed::All,
            max_alerts: 20,
            max_watchlist_items: 50,
            rate_limit: 300,
            features: TierFeatures {
                advanced_charts: true,
                export_data: true,
                api_access: true,
                priority_support: true,
            },
        }
    }

    fn validate(&self, tier: Tier) -> Result<(), PolicyError> {
        if self.allowed_symbols.is_empty() {
            return Err(PolicyError::EmptyAllowedSet { tier, kind: "symbol" });
        }
        if self.allowed_timeframes.is_empty() {
            return Err(PolicyError::EmptyAllowedSet { tier, kind: "timeframe" });
        }
        Ok(())
    }
}

/// The tier entitlement table.
///
/// Built once at startup and shared read-only (usually behind an `Arc`).
/// Every tier always has an entry, so lookups are infallible.
#[derive(Debug, Clone, PartialEq)]
pub struct TierPolicy {
    free: TierConfig,
    pro: TierConfig,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            free: TierConfig::free(),
            pro: TierConfig::pro(),
        }
    }
}

impl TierPolicy {
    pub fn new(free: TierConfig, pro: TierConfig) -> Result<Self, PolicyError> {
        free.validate(Tier::Free)?;
        pro.validate(Tier::Pro)?;
        Ok(Self { free, pro })
    }

    /// Parse a YAML table keyed by tier name (`FREE`, `PRO`)
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PolicyError> {
        let mut tiers: BTreeMap<Tier, TierConfig> = serde_yaml::from_str(yaml)?;
        let free = tiers.remove(&Tier::Free).ok_or(PolicyError::MissingTier(Tier::Free))?;
        let pro = tiers.remove(&Tier::Pro).ok_or(PolicyError::MissingTier(Tier::Pro))?;
        Self::new(free, pro)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let policy = Self::from_yaml_str(&contents)?;
        tracing::info!("Loaded tier policy from {}", path.as_ref().display());
        Ok(policy)
    }

    /// Load from a path when configured, otherwise use the built-in table
    pub fn load(path: Option<&Path>) -> Result<Self, PolicyError> {
        match path {
            Some(p) => Self::from_yaml_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn get(&self, tier: Tier) -> &TierConfig {
        match tier {
            Tier::Free => &self.free,
            Tier::Pro => &self.pro,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, &TierConfig)> {
        Tier::ALL.into_iter().map(move |t| (t, self.get(t)))
    }

    pub fn symbol_limit(&self, tier: Tier) -> u32 {
        self.get(tier).max_symbols
    }

    pub fn alert_limit(&self, tier: Tier) -> u32 {
        self.get(tier).max_alerts
    }

    pub fn watchlist_limit(&self, tier: Tier) -> u32 {
        self.get(tier).max_watchlist_items
    }

    pub fn rate_limit(&self, tier: Tier) -> u32 {
        self.get(tier).rate_limit
    }

    pub fn available_symbols(&self, tier: Tier) -> &Allowed {
        &self.get(tier).allowed_symbols
    }

    pub fn available_timeframes(&self, tier: Tier) -> &Allowed {
        &self.get(tier).allowed_timeframes
    }

    /// Concrete symbol list for display; the wildcard expands to the catalog
    pub fn accessible_symbols(&self, tier: Tier) -> Vec<String> {
        self.available_symbols(tier).expand(&SYMBOL_CATALOG)
    }

    pub fn accessible_timeframes(&self, tier: Tier) -> Vec<String> {
        self.available_timeframes(tier).expand(&TIMEFRAME_CATALOG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        let policy = TierPolicy::default();
        assert_eq!(policy.symbol_limit(Tier::Free), 5);
        assert_eq!(policy.symbol_limit(Tier::Pro), 15);
        assert_eq!(policy.alert_limit(Tier::Free), 5);
        assert_eq!(policy.alert_limit(Tier::Pro), 20);
        assert_eq!(policy.watchlist_limit(Tier::Free), 5);
        assert_eq!(policy.watchlist_limit(Tier::Pro), 50);
        assert_eq!(policy.rate_limit(Tier::Free), 60);
        assert_eq!(policy.rate_limit(Tier::Pro), 300);
    }

    #[test]
    fn pro_sets_are_wildcards() {
        let policy = TierPolicy::default();
        assert_eq!(policy.available_symbols(Tier::Pro), &Allowed::All);
        assert_eq!(policy.available_timeframes(Tier::Pro), &Allowed::All);
        assert_eq!(
            policy.available_timeframes(Tier::Free),
            &Allowed::only(["H1", "H4", "D1"])
        );
    }

    #[test]
    fn accessible_lists_expand_wildcards() {
        let policy = TierPolicy::default();
        assert_eq!(
            policy.accessible_symbols(Tier::Free),
            vec!["BTCUSD", "EURUSD", "USDJPY", "US30", "XAUUSD"]
        );
        let pro = policy.accessible_symbols(Tier::Pro);
        assert_eq!(pro.len(), 15);
        assert!(pro.contains(&"GBPUSD".to_string()));
        assert!(pro.contains(&"ETHUSD".to_string()));

        assert_eq!(policy.accessible_timeframes(Tier::Free), vec!["H1", "H4", "D1"]);
        assert_eq!(policy.accessible_timeframes(Tier::Pro).len(), 9);
    }

    #[test]
    fn catalogs_are_consistent() {
        let mut joined: Vec<&str> = FREE_SYMBOLS.to_vec();
        joined.extend(PRO_EXCLUSIVE_SYMBOLS);
        assert_eq!(joined, SYMBOL_CATALOG.to_vec());

        let mut tfs: Vec<&str> = FREE_TIMEFRAMES.to_vec();
        tfs.extend(PRO_EXCLUSIVE_TIMEFRAMES);
        assert_eq!(tfs, TIMEFRAME_CATALOG.to_vec());
    }

    #[test]
    fn rejects_empty_allowed_set() {
        let mut free = TierConfig::free();
        free.allowed_timeframes = Allowed::Only(vec![]);
        let err = TierPolicy::new(free, TierConfig::pro()).unwrap_err();
        assert!(matches!(err, PolicyError::EmptyAllowedSet { tier: Tier::Free, kind: "timeframe" }));
    }

    #[test]
    fn loads_yaml_table() {
        let yaml = r#"
FREE:
  displayName: Free
  priceUsd: 0
  maxSymbols: 1
  allowedSymbols:
    only: [XAUUSD]
  allowedTimeframes:
    only: [H1, H4, D1]
  maxAlerts: 3
  maxWatchlistItems: 2
  rateLimit: 30
  features: { advancedCharts: false, exportData: false, apiAccess: false, prioritySupport: false }
PRO:
  displayName: Pro
  priceUsd: 29
  maxSymbols: 15
  allowedSymbols: all
  allowedTimeframes: all
  maxAlerts: 20
  maxWatchlistItems: 50
  rateLimit: 300
  features: { advancedCharts: true, exportData: true, apiAccess: true, prioritySupport: true }
"#;
        let policy = TierPolicy::from_yaml_str(yaml).unwrap();
        assert_eq!(policy.alert_limit(Tier::Free), 3);
        assert_eq!(policy.accessible_symbols(Tier::Free), vec!["XAUUSD"]);
        assert!(policy.available_symbols(Tier::Pro).is_all());
    }

    #[test]
    fn yaml_missing_tier_is_an_error() {
        let yaml = r#"
FREE:
  displayName: Free
  priceUsd: 0
  maxSymbols: 5
  allowedSymbols: all
  allowedTimeframes: all
  maxAlerts: 5
  maxWatchlistItems: 5
  rateLimit: 60
  features: { advancedCharts: false, exportData: false, apiAccess: false, prioritySupport: false }
"#;
        let err = TierPolicy::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, PolicyError::MissingTier(Tier::Pro)));
    }
}
