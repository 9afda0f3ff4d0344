mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;

use common::{get_with_headers, send, test_app_with_rules, token_for};
use tiergate_api::middleware::GateRule;
use tiergate_api::tier::{Role, Tier};

#[tokio::test]
async fn free_caller_gets_403_on_gated_api() {
    let res = get_with_headers("/api/export/entitlements", &[]).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(
        res.json(),
        json!({
            "success": false,
            "error": "Tier restriction",
            "message": "Data export requires PRO tier.",
            "currentTier": "FREE",
            "requiredTier": "PRO"
        })
    );
}

#[tokio::test]
async fn tier_header_opens_the_gate() {
    let res = get_with_headers("/api/export/entitlements", &[("x-user-tier", "PRO")]).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("text/csv; charset=utf-8")
    );

    let body = res.text();
    assert!(body.starts_with("kind,value\n"));
    assert!(body.contains("symbol,GBPUSD\n"));
    assert!(body.contains("timeframe,H12\n"));
    assert!(body.contains("rate_limit,300\n"));
}

#[tokio::test]
async fn tier_cookie_counts_only_with_session_cookie() {
    let res = get_with_headers("/api/export/entitlements", &[("cookie", "user-tier=PRO")]).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = get_with_headers(
        "/api/export/entitlements",
        &[("cookie", "session-token=abc; user-tier=PRO")],
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = get_with_headers(
        "/api/export/entitlements",
        &[("cookie", "next-auth.session-token=abc; user-tier=PRO")],
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = get_with_headers(
        "/api/export/entitlements",
        &[("cookie", "__Secure-next-auth.session-token=abc; user-tier=PRO")],
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
}

async fn free_export_status(rules: Vec<GateRule>) -> StatusCode {
    let request = Request::builder()
        .uri("/api/export/entitlements")
        .body(Body::empty())
        .expect("request");
    send(test_app_with_rules(rules), request).await.status
}

#[tokio::test]
async fn first_matching_rule_decides() {
    let narrow_first = vec![
        GateRule::new("/api/export/entitlements", Tier::Free, "Entitlement export"),
        GateRule::new("/api/export", Tier::Pro, "Data export"),
    ];
    assert_eq!(free_export_status(narrow_first).await, StatusCode::OK);

    let broad_first = vec![
        GateRule::new("/api/export", Tier::Pro, "Data export"),
        GateRule::new("/api/export/entitlements", Tier::Free, "Entitlement export"),
    ];
    assert_eq!(free_export_status(broad_first).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn gate_reads_cookies_not_bearer_tier() {
    let pro = token_for("pro-user", Tier::Pro, Role::User, false);
    let bearer = format!("Bearer {}", pro);
    let res = get_with_headers("/api/export/entitlements", &[("authorization", bearer.as_str())]).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn pages_redirect_to_pricing() {
    let res = get_with_headers("/charts/pro", &[]).await;
    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        res.headers.get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/pricing?reason=Pro+charts+requires+PRO+tier.")
    );

    let res = get_with_headers("/charts/pro", &[("x-user-tier", "PRO")]).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ungated_paths_pass_through() {
    let res = get_with_headers("/api/access/timeframe/H1", &[]).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["data"]["allowed"], true);
}
