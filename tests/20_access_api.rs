mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{get, post_json, token_for};
use tiergate_api::tier::{Role, Tier};

#[tokio::test]
async fn anonymous_requests_use_free_tier() {
    let res = get("/api/access/symbol/XAUUSD", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "success": true, "data": { "allowed": true } }));

    let res = get("/api/access/symbol/GBPUSD", None).await;
    assert_eq!(
        res.json()["data"],
        json!({ "allowed": false, "reason": "Symbol GBPUSD requires PRO tier. Please upgrade." })
    );
}

#[tokio::test]
async fn pro_session_opens_everything() {
    let token = token_for("pro-user", Tier::Pro, Role::User, false);

    let res = get("/api/access/symbol/GBPUSD", Some(&token)).await;
    assert_eq!(res.json()["data"]["allowed"], true);

    let res = get("/api/access/timeframe/M5", Some(&token)).await;
    assert_eq!(res.json()["data"]["allowed"], true);

    let res = get("/api/access/chart/NDX100/H12", Some(&token)).await;
    assert_eq!(res.json()["data"]["allowed"], true);
}

#[tokio::test]
async fn chart_reports_symbol_denial_first() {
    let res = get("/api/access/chart/GBPUSD/M5", None).await;
    assert_eq!(
        res.json()["data"]["reason"],
        "Symbol GBPUSD requires PRO tier. Please upgrade."
    );

    let res = get("/api/access/chart/XAUUSD/M5", None).await;
    assert_eq!(
        res.json()["data"]["reason"],
        "Timeframe M5 requires PRO tier. Please upgrade."
    );
}

#[tokio::test]
async fn limits_meter() {
    let res = get("/api/limits/alerts?current=3", None).await;
    assert_eq!(res.json()["data"], json!({ "canCreate": true, "remaining": 2, "limit": 5 }));

    let res = get("/api/limits/watchlist", None).await;
    assert_eq!(res.json()["data"], json!({ "canCreate": true, "remaining": 5, "limit": 5 }));

    let token = token_for("pro-user", Tier::Pro, Role::User, false);
    let res = get("/api/limits/watchlist?current=60", Some(&token)).await;
    assert_eq!(res.json()["data"], json!({ "canCreate": false, "remaining": 0, "limit": 50 }));

    let res = get("/api/limits/portfolios", None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn quota_checks() {
    let res = post_json("/api/alerts/check", None, json!({ "currentCount": 4 })).await;
    assert_eq!(res.json()["data"], json!({ "allowed": true }));

    let res = post_json("/api/alerts/check", None, json!({ "currentCount": 5 })).await;
    let data = res.json()["data"].clone();
    assert_eq!(data["allowed"], false);
    assert_eq!(data["reason"], "Alert limit reached (5). Upgrade to PRO for up to 20 alerts.");

    let res = post_json("/api/watchlist/check", None, json!({ "currentCount": 5 })).await;
    let reason = res.json()["data"]["reason"].as_str().unwrap_or_default().to_string();
    assert!(reason.contains('5') && reason.contains("PRO"), "{reason}");

    let token = token_for("pro-user", Tier::Pro, Role::User, false);
    let res = post_json("/api/watchlist/check", Some(&token), json!({ "currentCount": 49 })).await;
    assert_eq!(res.json()["data"]["allowed"], true);
}

#[tokio::test]
async fn malformed_quota_input_keeps_error_envelope() {
    let res = get("/api/limits/alerts?current=-1", None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let body = res.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");

    let res = post_json("/api/alerts/check", None, json!({ "currentCount": -1 })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["code"], "BAD_REQUEST");

    let res = post_json("/api/watchlist/check", None, json!({})).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["success"], false);
}

#[tokio::test]
async fn tier_catalog() {
    let res = get("/api/tiers", None).await;
    let tiers = res.json()["data"].clone();
    assert_eq!(tiers[0]["tier"], "FREE");
    assert_eq!(tiers[0]["accessibleSymbols"].as_array().map(Vec::len), Some(5));
    assert_eq!(tiers[1]["tier"], "PRO");
    assert_eq!(tiers[1]["maxSymbols"], 15);
    assert_eq!(tiers[1]["allowedSymbols"], "all");

    let res = get("/api/tiers/FREE", None).await;
    let free = res.json()["data"].clone();
    assert_eq!(free["chartCombinations"], 15);
    assert_eq!(free["upgradePath"], json!(["PRO"]));
    assert_eq!(free["nextUpgrade"]["additionalAlerts"], 15);

    let res = get("/api/tiers/ENTERPRISE", None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["error"], "Invalid tier: ENTERPRISE. Valid tiers are: FREE, PRO");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let res = get("/api/nothing-here", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()["code"], "NOT_FOUND");
}
