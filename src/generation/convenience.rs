//! Convenience functions backed by a lazily built global analyzer.

use std::sync::OnceLock;

use crate::config::GuardConfig;
use crate::error::Result;
use crate::types::{ImageAnalysis, TextAnalysis};

use super::analyzer::Analyzer;

static GLOBAL_ANALYZER: OnceLock<Analyzer> = OnceLock::new();

/// Global analyzer, configured from the config file and environment on first use.
pub fn global() -> Result<&'static Analyzer> {
    if let Some(analyzer) = GLOBAL_ANALYZER.get() {
        return Ok(analyzer);
    }
    let analyzer = Analyzer::from_config(GuardConfig::load()?)?;
    Ok(GLOBAL_ANALYZER.get_or_init(|| analyzer))
}

/// Screen a chat transcript with the global analyzer.
pub async fn analyze_text(text: &str) -> Result<TextAnalysis> {
    global()?.analyze_text(text).await
}

/// Check an image with the global analyzer.
pub async fn analyze_image(data: &str, mime_type: Option<&str>) -> Result<ImageAnalysis> {
    global()?.analyze_image(data, mime_type).await
}
