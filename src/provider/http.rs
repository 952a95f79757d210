//! Shared HTTP client and provider error-body helpers.

use std::time::Duration;

use reqwest::StatusCode;

use crate::error::{Result, TruthGuardError};

/// Build the HTTP client used for every provider call.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()?)
}

/// Turn a non-success response into an API error carrying a readable reason.
pub fn status_to_error(status: StatusCode, body: &str) -> TruthGuardError {
    TruthGuardError::api(status.as_u16(), failure_reason(status, body))
}

/// Prefer the provider's `error.message`, else the canonical reason phrase.
pub fn failure_reason(status: StatusCode, body: &str) -> String {
    extract_error_message(body)
        .or_else(|| status.canonical_reason().map(ToOwned::to_owned))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(ToOwned::to_owned)
        })
        .filter(|m| !m.is_empty())
}
