//! Error types for TruthGuard.

pub mod unified;

pub use unified::{join_failures, ErrorCategory, ProbeFailure};

use thiserror::Error;

/// Primary error type for all TruthGuard operations.
#[derive(Error, Debug)]
pub enum TruthGuardError {
    #[error("Server configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("All attempts failed: {}", join_failures(.failures))]
    ProbeExhausted { failures: Vec<ProbeFailure> },

    #[error(
        "Analysis timed out after {secs}s. Previous errors: {}",
        join_failures(.failures)
    )]
    TimedOut {
        secs: u64,
        failures: Vec<ProbeFailure>,
    },

    #[error("Diagnosis failed: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("No candidates returned from AI")]
    EmptyCandidates,

    #[error("Failed to decode AI response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid AI response: {0}")]
    InvalidResult(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),
}

/// Failure of the model discovery fallback.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("ListModels failed ({status}). Check API Key permissions.")]
    ListingFailed { status: u16, message: String },

    #[error("ListModels request failed: {0}")]
    ListingUnreachable(String),

    #[error(
        "Auto-discovery failed. Available models for your key: {}. Previous errors: {}",
        .available.join(", "),
        join_failures(.failures)
    )]
    NoWorkingModel {
        available: Vec<String>,
        failures: Vec<ProbeFailure>,
    },
}

impl DiscoveryError {
    /// Status code of a failed listing call, if that is what went wrong.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ListingFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Every model identifier attempted before giving up, in order.
    pub fn attempted(&self) -> Vec<&str> {
        match self {
            Self::NoWorkingModel { failures, .. } => {
                failures.iter().map(|f| f.model.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl TruthGuardError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn missing_api_key() -> Self {
        Self::Configuration("API Key missing".into())
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) | Self::ConfigFile(_) | Self::Io(_) => {
                ErrorCategory::Configuration
            }
            Self::Validation(_) => ErrorCategory::Validation,
            Self::ProbeExhausted { .. } | Self::TimedOut { .. } => ErrorCategory::Exhausted,
            Self::Discovery(_) => ErrorCategory::Discovery,
            Self::EmptyCandidates | Self::Decode(_) | Self::InvalidResult(_) => {
                ErrorCategory::Decode
            }
            Self::Network(_) => ErrorCategory::Network,
            Self::Api { .. } => ErrorCategory::Upstream,
        }
    }

    /// Status code reported at the host boundary.
    pub fn http_status(&self) -> u16 {
        self.category().http_status()
    }

    /// Failures recorded while probing, if this error carries any.
    pub fn probe_failures(&self) -> &[ProbeFailure] {
        match self {
            Self::ProbeExhausted { failures }
            | Self::TimedOut { failures, .. }
            | Self::Discovery(DiscoveryError::NoWorkingModel { failures, .. }) => failures,
            _ => &[],
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TruthGuardError>;
