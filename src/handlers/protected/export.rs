// handlers/protected/export.rs - GET /api/export/entitlements
//
// Sits behind the `/api/export` gate rule, so the tier here is the same
// cookie/header tier the gate admitted.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
};

use crate::middleware::tier_check::extract_tier_from_request;
use crate::state::AppState;

/// RFC 4180 quoting for fields holding a comma, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn push_row(csv: &mut String, kind: &str, value: &str) {
    csv.push_str(&csv_field(kind));
    csv.push(',');
    csv.push_str(&csv_field(value));
    csv.push('\n');
}

pub async fn entitlements(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let tier = extract_tier_from_request(&headers);
    let config = state.policy.get(tier);

    let mut csv = String::from("kind,value\n");
    for symbol in state.policy.accessible_symbols(tier) {
        push_row(&mut csv, "symbol", &symbol);
    }
    for timeframe in state.policy.accessible_timeframes(tier) {
        push_row(&mut csv, "timeframe", &timeframe);
    }
    push_row(&mut csv, "max_alerts", &config.max_alerts.to_string());
    push_row(&mut csv, "max_watchlist_items", &config.max_watchlist_items.to_string());
    push_row(&mut csv, "rate_limit", &config.rate_limit.to_string());

    let disposition = format!("attachment; filename=\"entitlements-{}.csv\"", tier.as_str().to_lowercase());
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_are_written_as_is() {
        assert_eq!(csv_field("XAUUSD"), "XAUUSD");
        assert_eq!(csv_field("H12"), "H12");
    }

    #[test]
    fn delimiters_and_quotes_are_escaped() {
        assert_eq!(csv_field("US30,NAS100"), "\"US30,NAS100\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("a\nb"), "\"a\nb\"");

        let mut csv = String::new();
        push_row(&mut csv, "symbol", "BTC,USD");
        assert_eq!(csv, "symbol,\"BTC,USD\"\n");
    }
}
