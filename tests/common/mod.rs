//! Shared test helpers: Gemini reply builders, a mock Gemini server, and a scripted transport.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use truthguard::config::GuardConfig;
use truthguard::error::{Result, TruthGuardError};
use truthguard::provider::{GenerateContentRequest, ListedModel, ModelTransport};

pub const TEST_KEY: &str = "test-key";

/// A `generateContent` success body whose first part carries `text`.
pub fn gemini_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    })
}

pub fn text_verdict(score: u32) -> String {
    json!({
        "riskScore": score,
        "riskLevel": "Low",
        "category": "Safe",
        "summary": "看起來是正常對話",
        "anomalies": [],
        "recommendations": ["保持警覺"]
    })
    .to_string()
}

pub fn image_verdict(score: u32, is_safe: bool) -> String {
    json!({
        "isSafe": is_safe,
        "riskScore": score,
        "riskLevel": "低風險",
        "summary": "這張照片看起來是真實的",
        "faceAnalysis": "皮膚紋理自然",
        "lightingAnalysis": "光影一致",
        "artifactAnalysis": "未發現"
    })
    .to_string()
}

pub fn listing(models: &[(&str, &[&str])]) -> serde_json::Value {
    let models: Vec<_> = models
        .iter()
        .map(|(name, methods)| json!({"name": name, "supportedGenerationMethods": methods}))
        .collect();
    json!({ "models": models })
}

pub fn generate_path(model: &str) -> String {
    format!("/models/{model}:generateContent")
}

/// Mount a `generateContent` mock for one model, expecting `calls` hits.
pub async fn mount_generate(server: &MockServer, model: &str, response: ResponseTemplate, calls: u64) {
    Mock::given(method("POST"))
        .and(path(generate_path(model)))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

pub async fn mount_listing(server: &MockServer, response: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

pub fn not_found(model: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "error": {
            "code": 404,
            "message": format!("models/{model} is not found for API version v1beta"),
            "status": "NOT_FOUND"
        }
    }))
}

pub fn config_for(server: &MockServer, text_models: &[&str], image_models: &[&str]) -> GuardConfig {
    GuardConfig::builder()
        .api_key(TEST_KEY)
        .base_url(server.uri())
        .text_models(text_models.iter().map(|m| (*m).to_string()).collect())
        .image_models(image_models.iter().map(|m| (*m).to_string()).collect())
        .build()
}

pub async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map(|r| r.len()).unwrap_or(0)
}

/// Transport with scripted per-model outcomes that records every call.
pub struct ScriptedTransport {
    replies: HashMap<String, std::result::Result<String, u16>>,
    listing: Option<Vec<ListedModel>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            listing: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn succeed(mut self, model: &str, verdict: &str) -> Self {
        self.replies
            .insert(model.to_string(), Ok(gemini_reply(verdict).to_string()));
        self
    }

    pub fn fail(mut self, model: &str, status: u16) -> Self {
        self.replies.insert(model.to_string(), Err(status));
        self
    }

    pub fn with_listing(mut self, names: &[&str]) -> Self {
        self.listing = Some(
            names
                .iter()
                .map(|n| ListedModel {
                    name: format!("models/{n}"),
                    supported_generation_methods: vec!["generateContent".into()],
                })
                .collect(),
        );
        self
    }

    /// Calls in order: model ids, and `LIST` for listing calls.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelTransport for ScriptedTransport {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn generate_content(&self, model: &str, _request: &GenerateContentRequest) -> Result<String> {
        self.calls.lock().unwrap().push(model.to_string());
        match self.replies.get(model) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(TruthGuardError::api(*status, "scripted failure")),
            None => Err(TruthGuardError::api(404, "unknown model")),
        }
    }

    async fn list_models(&self) -> Result<Vec<ListedModel>> {
        self.calls.lock().unwrap().push("LIST".to_string());
        self.listing
            .clone()
            .ok_or_else(|| TruthGuardError::api(500, "listing unavailable"))
    }
}
