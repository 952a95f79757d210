//! Error classification and the host-boundary status contract.

use serde::{Deserialize, Serialize};

/// Broad error category used to pick a host-boundary status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Upstream credential absent. Reported before any network call.
    Configuration,
    /// Caller supplied unusable input.
    Validation,
    /// Every candidate model failed, or the analysis ran out of time.
    Exhausted,
    /// Model listing failed, or no discovered model worked.
    Discovery,
    /// Provider reply could not be turned into a structured result.
    Decode,
    /// Transport-level failure outside the candidate loop.
    Network,
    Upstream,
}

impl ErrorCategory {
    /// HTTP status the host boundary reports for this category.
    pub fn http_status(self) -> u16 {
        match self {
            Self::Validation => 400,
            _ => 500,
        }
    }

    /// Whether the failure happened before any network call was issued.
    pub fn is_fail_fast(self) -> bool {
        matches!(self, Self::Configuration | Self::Validation)
    }
}

/// A single failed attempt against one model candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeFailure {
    pub model: String,
    pub reason: String,
}

impl ProbeFailure {
    pub fn new(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.model, self.reason)
    }
}

/// Join failures the way operators read them in logs: `m1: reason|m2: reason`.
pub fn join_failures(failures: &[ProbeFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("|")
}
