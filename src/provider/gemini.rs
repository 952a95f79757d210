//! Google Gemini (`generativelanguage`) transport.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{CredentialPlacement, GuardConfig};
use crate::error::Result;

use super::http::{build_client, status_to_error};
use super::{GenerateContentRequest, ListedModel, ModelListing, ModelTransport};

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    placement: CredentialPlacement,
}

impl GeminiTransport {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        placement: CredentialPlacement,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            placement,
        })
    }

    /// Build from config; fails if no credential is configured.
    pub fn from_config(config: &GuardConfig) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Self::new(
            config.base_url.clone(),
            api_key,
            config.credential_placement,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.placement {
            CredentialPlacement::Query => builder.query(&[("key", self.api_key.as_str())]),
            CredentialPlacement::Header => builder.header(API_KEY_HEADER, self.api_key.as_str()),
        }
    }
}

#[async_trait]
impl ModelTransport for GeminiTransport {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn generate_content(&self, model: &str, request: &GenerateContentRequest) -> Result<String> {
        // Logged before the credential is attached.
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!(model, %url, "Gemini generateContent");

        let resp = self
            .authorize(self.client.post(&url))
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(status_to_error(status, &body));
        }
        Ok(body)
    }

    async fn list_models(&self) -> Result<Vec<ListedModel>> {
        let url = format!("{}/models", self.base_url);
        debug!(%url, "Gemini listModels");

        let resp = self.authorize(self.client.get(&url)).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(status_to_error(status, &body));
        }
        let listing: ModelListing = serde_json::from_str(&body)?;
        Ok(listing.models)
    }
}
