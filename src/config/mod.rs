//! Configuration system (layered: code > env > config file > defaults).

use std::fmt;
use std::path::{Path, PathBuf};

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Result, TruthGuardError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Flash first: chat analysis favours latency.
pub const DEFAULT_TEXT_MODELS: &[&str] = &["gemini-1.5-flash", "gemini-1.5-flash-001", "gemini-1.5-pro"];

/// Pro first: image analysis needs the stronger vision model, Flash is the backup.
pub const DEFAULT_IMAGE_MODELS: &[&str] = &[
    "gemini-1.5-pro",
    "gemini-1.5-pro-001",
    "gemini-1.5-flash",
    "gemini-1.5-flash-001",
];

/// Where the upstream credential travels on each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CredentialPlacement {
    /// `?key=...` on the URL.
    #[default]
    Query,
    /// `x-goog-api-key` request header.
    Header,
}

/// Runtime configuration for the analyzer and the HTTP host.
#[derive(Clone, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    #[builder(into)]
    pub api_key: Option<String>,
    #[builder(default = DEFAULT_BASE_URL.to_string(), into)]
    pub base_url: String,
    #[builder(default = to_owned_list(DEFAULT_TEXT_MODELS))]
    pub text_models: Vec<String>,
    #[builder(default = to_owned_list(DEFAULT_IMAGE_MODELS))]
    pub image_models: Vec<String>,
    /// Fall back to the provider's model listing once the priority list is exhausted.
    #[builder(default = true)]
    pub discovery: bool,
    /// Substring a listed model name must contain to be considered.
    #[builder(default = "gemini".to_string(), into)]
    pub model_family: String,
    /// Generation method a listed model must declare.
    #[builder(default = "generateContent".to_string(), into)]
    pub generation_method: String,
    #[builder(default)]
    pub credential_placement: CredentialPlacement,
    /// Per-call HTTP timeout.
    #[builder(default = 120)]
    pub timeout_secs: u64,
    /// Budget for one whole analysis, across every candidate and the listing.
    #[builder(default = 240)]
    pub analysis_timeout_secs: u64,
    #[builder(default = "127.0.0.1".to_string(), into)]
    pub host: String,
    #[builder(default = 8000)]
    pub port: u16,
}

fn to_owned_list(models: &[&str]) -> Vec<String> {
    models.iter().map(|m| (*m).to_string()).collect()
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(TruthGuardError::Configuration(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}

impl fmt::Debug for GuardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("text_models", &self.text_models)
            .field("image_models", &self.image_models)
            .field("discovery", &self.discovery)
            .field("model_family", &self.model_family)
            .field("generation_method", &self.generation_method)
            .field("credential_placement", &self.credential_placement)
            .field("timeout_secs", &self.timeout_secs)
            .field("analysis_timeout_secs", &self.analysis_timeout_secs)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GuardConfig {
    /// Default config file location (`<config_dir>/truthguard/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "truthguard")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Parse a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Load the default config file (if present), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "Loading config file");
                Self::from_file(&path)?
            }
            _ => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Environment only, on top of defaults.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("GOOGLE_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup("TRUTHGUARD_BASE_URL") {
            self.base_url = url;
        }
        if let Some(raw) = lookup("TRUTHGUARD_TEXT_MODELS") {
            self.text_models = parse_list(&raw);
        }
        if let Some(raw) = lookup("TRUTHGUARD_IMAGE_MODELS") {
            self.image_models = parse_list(&raw);
        }
        if let Some(raw) = lookup("TRUTHGUARD_DISCOVERY") {
            self.discovery = parse_bool("TRUTHGUARD_DISCOVERY", &raw)?;
        }
        if let Some(raw) = lookup("TRUTHGUARD_CREDENTIAL") {
            self.credential_placement = raw.parse().map_err(|_| {
                TruthGuardError::Configuration(format!(
                    "TRUTHGUARD_CREDENTIAL must be 'query' or 'header', got '{raw}'"
                ))
            })?;
        }
        if let Some(raw) = lookup("TRUTHGUARD_ANALYSIS_TIMEOUT") {
            self.analysis_timeout_secs = raw.trim().parse().map_err(|_| {
                TruthGuardError::Configuration(format!(
                    "TRUTHGUARD_ANALYSIS_TIMEOUT must be whole seconds, got '{raw}'"
                ))
            })?;
        }
        if let Some(host) = lookup("TRUTHGUARD_HOST") {
            self.host = host;
        }
        if let Some(raw) = lookup("TRUTHGUARD_PORT") {
            self.port = raw.trim().parse().map_err(|_| {
                TruthGuardError::Configuration(format!("TRUTHGUARD_PORT is not a port: '{raw}'"))
            })?;
        }
        Ok(())
    }

    /// The upstream credential, if one is configured and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.api_key = Some(key.into());
    }

    /// Fails with a configuration error when no credential is present.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key().ok_or_else(TruthGuardError::missing_api_key)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
