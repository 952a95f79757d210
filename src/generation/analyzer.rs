//! The analysis entry point: validate, probe, extract.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::GuardConfig;
use crate::error::{ProbeFailure, Result, TruthGuardError};
use crate::models::{CandidateOrigin, DiscoveryFilter};
use crate::provider::{GeminiTransport, ModelTransport};
use crate::types::{AnalysisRequest, AnalysisResult, ImageAnalysis, InputKind, TextAnalysis};

use super::extract::extract_result;
use super::probe::ModelProber;
use super::prompt::build_request;

/// A decoded result plus which model produced it.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub model: String,
    pub origin: CandidateOrigin,
    /// Candidates that failed before `model` answered.
    pub failures: Vec<ProbeFailure>,
}

/// Runs analyses against the configured provider.
///
/// Holds no per-request state, so one instance can serve concurrent callers.
#[derive(Clone)]
pub struct Analyzer {
    config: Arc<GuardConfig>,
    transport: Option<Arc<dyn ModelTransport>>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .field(
                "transport",
                &self.transport.as_ref().map(|t| t.provider_name().to_string()),
            )
            .finish()
    }
}

impl Analyzer {
    /// Build with the Gemini transport.
    ///
    /// A missing credential is not an error here; every analysis then fails
    /// with a configuration error instead, before any network call.
    pub fn from_config(config: GuardConfig) -> Result<Self> {
        let transport: Option<Arc<dyn ModelTransport>> = if config.api_key().is_some() {
            Some(Arc::new(GeminiTransport::from_config(&config)?))
        } else {
            warn!("No GEMINI_API_KEY configured; analyses will fail until one is set");
            None
        };
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    /// Build with any transport (tests, alternative providers).
    pub fn with_transport(config: GuardConfig, transport: Arc<dyn ModelTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport: Some(transport),
        }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Fails with a configuration error when no credential is set.
    pub fn check_credential(&self) -> Result<()> {
        self.transport().map(|_| ())
    }

    fn transport(&self) -> Result<&dyn ModelTransport> {
        self.config.require_api_key()?;
        self.transport
            .as_deref()
            .ok_or_else(TruthGuardError::missing_api_key)
    }

    fn priority_for(&self, kind: InputKind) -> Vec<String> {
        match kind {
            InputKind::Text => self.config.text_models.clone(),
            InputKind::Image => self.config.image_models.clone(),
        }
    }

    /// Run one analysis end to end.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis> {
        let transport = self.transport()?;
        let kind = request.kind();
        let body = build_request(request);

        let mut prober = ModelProber::new(transport, self.priority_for(kind))
            .with_budget(Duration::from_secs(self.config.analysis_timeout_secs));
        if self.config.discovery {
            prober = prober.with_discovery(DiscoveryFilter::from_config(&self.config));
        }
        let invocation = prober.run(&body).await?;
        let result = extract_result(kind, &invocation.body)?;

        info!(
            %kind,
            model = %invocation.model,
            risk_score = result.risk_score(),
            "Analysis complete"
        );
        Ok(Analysis {
            result,
            model: invocation.model,
            origin: invocation.origin,
            failures: invocation.failures,
        })
    }

    /// Screen a chat transcript. Fails on empty text.
    pub async fn analyze_text(&self, text: &str) -> Result<TextAnalysis> {
        self.check_credential()?;
        let request = AnalysisRequest::text(text)?;
        match self.analyze(&request).await?.result {
            AnalysisResult::Text(text) => Ok(text),
            other => Err(mismatch(InputKind::Text, &other)),
        }
    }

    /// Check base64 image bytes for AI generation. Fails on empty bytes.
    pub async fn analyze_image(&self, data: &str, mime_type: Option<&str>) -> Result<ImageAnalysis> {
        self.check_credential()?;
        let request = AnalysisRequest::image(data, mime_type.map(ToOwned::to_owned))?;
        match self.analyze(&request).await?.result {
            AnalysisResult::Image(image) => Ok(image),
            other => Err(mismatch(InputKind::Image, &other)),
        }
    }
}

fn mismatch(expected: InputKind, got: &AnalysisResult) -> TruthGuardError {
    TruthGuardError::InvalidResult(format!("expected {expected} result, got {}", got.kind()))
}
