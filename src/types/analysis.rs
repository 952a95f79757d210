//! Structured analysis results decoded from model output.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, TruthGuardError};

use super::request::InputKind;

/// Scores at or below this are "real" in the image prompt's banding.
pub const IMAGE_SAFE_THRESHOLD: u32 = 40;

/// Models sometimes answer `null` for a field they have nothing to say about.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Result of screening a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    pub risk_score: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_level: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub anomalies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
}

/// Result of checking an image for AI generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_safe: Option<bool>,
    pub risk_score: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_level: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub face_analysis: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lighting_analysis: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artifact_analysis: String,
}

impl ImageAnalysis {
    /// The model's verdict, or the score band when it omitted one.
    pub fn is_safe(&self) -> bool {
        self.is_safe
            .unwrap_or(self.risk_score <= IMAGE_SAFE_THRESHOLD)
    }
}

/// A decoded result, one variant per input kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Text(TextAnalysis),
    Image(ImageAnalysis),
}

impl AnalysisResult {
    /// Decode model output for the given input kind, then check the score range.
    pub fn decode(kind: InputKind, json: &str) -> Result<Self> {
        let result = match kind {
            InputKind::Text => Self::Text(serde_json::from_str(json)?),
            InputKind::Image => {
                let mut image: ImageAnalysis = serde_json::from_str(json)?;
                image.is_safe = Some(image.is_safe());
                Self::Image(image)
            }
        };
        result.validate()?;
        Ok(result)
    }

    pub fn kind(&self) -> InputKind {
        match self {
            Self::Text(_) => InputKind::Text,
            Self::Image(_) => InputKind::Image,
        }
    }

    pub fn risk_score(&self) -> u32 {
        match self {
            Self::Text(t) => t.risk_score,
            Self::Image(i) => i.risk_score,
        }
    }

    pub fn risk_level(&self) -> &str {
        match self {
            Self::Text(t) => &t.risk_level,
            Self::Image(i) => &i.risk_level,
        }
    }

    pub fn summary(&self) -> &str {
        match self {
            Self::Text(t) => &t.summary,
            Self::Image(i) => &i.summary,
        }
    }

    fn validate(&self) -> Result<()> {
        let score = self.risk_score();
        if score > 100 {
            return Err(TruthGuardError::InvalidResult(format!(
                "riskScore {score} outside 0-100"
            )));
        }
        Ok(())
    }
}
