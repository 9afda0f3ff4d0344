use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use tiergate_api::config;
use tiergate_api::session::InMemoryAffiliateStore;
use tiergate_api::tier::TierPolicy;
use tiergate_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SECURITY_JWT_SECRET, POLICY_*, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting tiergate API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        if tiergate_api::is_production!() {
            anyhow::bail!("SECURITY_JWT_SECRET must be set in production");
        }
        tracing::warn!("SECURITY_JWT_SECRET is empty; bearer tokens will be rejected");
    } else if tiergate_api::is_development!() {
        tracing::debug!("Using development JWT secret");
    }

    let policy = TierPolicy::load(config.policy.tier_config_path.as_deref())
        .context("failed to load tier policy")?;

    let affiliates = match &config.store.affiliate_seed_path {
        Some(path) => InMemoryAffiliateStore::from_json_file(path).context("failed to seed affiliate store")?,
        None => InMemoryAffiliateStore::new(),
    };

    let state = AppState::from_config(policy, Arc::new(affiliates));
    let app = tiergate_api::app(state);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("tiergate API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
