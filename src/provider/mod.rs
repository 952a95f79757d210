//! Model transport trait and the Gemini wire format.

pub mod gemini;
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use gemini::GeminiTransport;

/// Body of a `generateContent` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// One content part: plain text or inline base64 data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

/// Successful `generateContent` reply, as far as we read it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseCandidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

/// One entry of the provider's model listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedModel {
    pub name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelListing {
    #[serde(default)]
    pub models: Vec<ListedModel>,
}

/// Seam between the probing logic and the network.
///
/// Each method is exactly one HTTP round trip. Non-success statuses come back
/// as `TruthGuardError::Api`, transport failures as `TruthGuardError::Network`.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    /// Provider name used in logs.
    fn provider_name(&self) -> &str;

    /// Call `generateContent` on one model; returns the raw success body.
    async fn generate_content(&self, model: &str, request: &GenerateContentRequest) -> Result<String>;

    /// Fetch the provider's model listing.
    async fn list_models(&self) -> Result<Vec<ListedModel>>;
}
