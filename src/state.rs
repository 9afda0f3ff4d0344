use std::sync::Arc;

use crate::middleware::tier_check::GateRule;
use crate::session::{AffiliateStore, InMemoryAffiliateStore};
use crate::tier::TierPolicy;

/// Shared, read-only application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub policy: Arc<TierPolicy>,
    pub affiliates: Arc<dyn AffiliateStore>,
    pub gate_rules: Arc<[GateRule]>,
    pub pricing_path: Arc<str>,
}

impl AppState {
    pub fn new(policy: TierPolicy, affiliates: Arc<dyn AffiliateStore>) -> Self {
        Self {
            policy: Arc::new(policy),
            affiliates,
            gate_rules: Arc::from(Vec::<GateRule>::new()),
            pricing_path: Arc::from("/pricing"),
        }
    }

    pub fn with_gate_rules(mut self, rules: Vec<GateRule>) -> Self {
        self.gate_rules = Arc::from(rules);
        self
    }

    pub fn with_pricing_path(mut self, path: impl AsRef<str>) -> Self {
        self.pricing_path = Arc::from(path.as_ref());
        self
    }

    /// State built from the loaded config: gate rules and pricing path
    pub fn from_config(policy: TierPolicy, affiliates: Arc<dyn AffiliateStore>) -> Self {
        let cfg = &crate::config::config().policy;
        Self::new(policy, affiliates)
            .with_gate_rules(cfg.gate_rules.clone())
            .with_pricing_path(&cfg.pricing_path)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(TierPolicy::default(), Arc::new(InMemoryAffiliateStore::new()))
    }
}
