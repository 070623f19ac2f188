//! Metrics collection.
//!
//! # Metrics
//! - `budget_client_requests_total` (counter): completed attempts by method, status
//! - `budget_client_retries_total` (counter): scheduled retries by error kind
//! - `budget_client_token_refresh_total` (counter): refresh attempts by outcome
//! - `budget_client_logouts_total` (counter): forced logouts
//!
//! # Design Decisions
//! - Uses the `metrics` facade only; the embedding application installs a
//!   recorder (or none, in which case updates are no-ops)
//! - Status label is "none" when no response was received

use crate::errors::ErrorKind;

pub fn record_request(method: &str, status: Option<u16>) {
    let status = status.map_or_else(|| "none".to_string(), |s| s.to_string());
    metrics::counter!(
        "budget_client_requests_total",
        "method" => method.to_string(),
        "status" => status
    )
    .increment(1);
}

pub fn record_retry(kind: ErrorKind) {
    metrics::counter!("budget_client_retries_total", "kind" => kind.as_str()).increment(1);
}

pub fn record_refresh(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("budget_client_token_refresh_total", "outcome" => outcome).increment(1);
}

pub fn record_logout() {
    metrics::counter!("budget_client_logouts_total").increment(1);
}
