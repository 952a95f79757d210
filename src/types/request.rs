//! Caller-supplied analysis requests.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Result, TruthGuardError};

pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// What the caller asked us to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InputKind {
    Text,
    Image,
}

/// One analysis request. Validated on construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    kind: InputKind,
    payload: String,
    mime_type: Option<String>,
}

impl AnalysisRequest {
    /// A chat transcript to screen for scams.
    pub fn text(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TruthGuardError::validation("Missing text input"));
        }
        Ok(Self {
            kind: InputKind::Text,
            payload: text,
            mime_type: None,
        })
    }

    /// Base64 image bytes, optionally as a `data:<mime>;base64,` URL.
    ///
    /// An explicit `mime_type` wins over the one embedded in a data URL.
    pub fn image(data: impl Into<String>, mime_type: Option<String>) -> Result<Self> {
        let data = data.into();
        let (embedded_mime, encoded) = split_data_url(&data);
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(TruthGuardError::validation("Missing image data"));
        }
        let mime_type = mime_type
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .or(embedded_mime);
        Ok(Self {
            kind: InputKind::Image,
            payload: encoded.to_string(),
            mime_type,
        })
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Declared MIME type. Images without one are sent as JPEG.
    pub fn mime_type(&self) -> Option<&str> {
        match self.kind {
            InputKind::Text => None,
            InputKind::Image => Some(self.mime_type.as_deref().unwrap_or(DEFAULT_IMAGE_MIME)),
        }
    }
}

fn split_data_url(data: &str) -> (Option<String>, &str) {
    let Some(rest) = data.strip_prefix("data:") else {
        return (None, data);
    };
    let Some((header, encoded)) = rest.split_once(',') else {
        return (None, data);
    };
    let mime = header
        .split(';')
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToOwned::to_owned);
    (mime, encoded)
}
