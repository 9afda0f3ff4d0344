#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use tiergate_api::auth::{generate_jwt, Claims};
use tiergate_api::middleware::GateRule;
use tiergate_api::session::{AffiliateProfile, InMemoryAffiliateStore, SessionUser};
use tiergate_api::tier::{Role, Tier, TierPolicy};
use tiergate_api::AppState;

/// Server binary running on a free port; killed on drop
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn(secret: &str) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_tiergate-api"))
            .env("TIERGATE_PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("SECURITY_JWT_SECRET", secret)
            .env("POLICY_GATE_RULES", "/api/export=PRO:Data export")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Server signing tokens with the same secret as this test process
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with_secret(&tiergate_api::config::config().security.jwt_secret).await
}

pub async fn spawn_server_with_secret(secret: &str) -> Result<TestServer> {
    let server = TestServer::spawn(secret)?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// In-process router with the default policy, one seeded affiliate and the
/// default export gate
pub fn test_app() -> Router {
    test_app_with_rules(vec![
        GateRule::new("/api/export", Tier::Pro, "Data export"),
        GateRule::new("/charts/pro", Tier::Pro, "Pro charts"),
    ])
}

pub fn test_app_with_rules(rules: Vec<GateRule>) -> Router {
    let affiliates = InMemoryAffiliateStore::with_profiles([AffiliateProfile::new("affiliate-1", "TRADE10")]);
    let state = AppState::new(TierPolicy::default(), Arc::new(affiliates))
        .with_gate_rules(rules)
        .with_pricing_path("/pricing");
    tiergate_api::routes::router(state)
}

pub fn token_for(id: &str, tier: Tier, role: Role, is_affiliate: bool) -> String {
    let user = SessionUser {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        name: None,
        tier,
        role,
        is_affiliate,
    };
    let claims = Claims::new(&user).expect("claims");
    generate_jwt(&claims).expect("token generation")
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("read body").to_vec();
    TestResponse { status, headers, body }
}

pub async fn get(path: &str, token: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(Method::GET).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    send(test_app(), builder.body(Body::empty()).expect("request")).await
}

pub async fn get_with_headers(path: &str, headers: &[(&str, &str)]) -> TestResponse {
    let mut builder = Request::builder().method(Method::GET).uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(test_app(), builder.body(Body::empty()).expect("request")).await
}

pub async fn post_json(path: &str, token: Option<&str>, body: Value) -> TestResponse {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    send(test_app(), builder.body(Body::from(body.to_string())).expect("request")).await
}
