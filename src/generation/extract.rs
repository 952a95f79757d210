//! Response extraction: candidate text, fence stripping, structured decode.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, TruthGuardError};
use crate::provider::GenerateContentResponse;
use crate::types::{AnalysisResult, InputKind};

static OPENING_FENCE: OnceLock<Regex> = OnceLock::new();
static CLOSING_FENCE: OnceLock<Regex> = OnceLock::new();

fn opening_fence() -> &'static Regex {
    OPENING_FENCE.get_or_init(|| Regex::new(r"^\s*```[A-Za-z0-9_-]*").expect("valid regex"))
}

fn closing_fence() -> &'static Regex {
    CLOSING_FENCE.get_or_init(|| Regex::new(r"```\s*$").expect("valid regex"))
}

/// Strip a leading ```` ```json ```` / ```` ``` ```` and a trailing ```` ``` ````.
///
/// Surrounding whitespace is irrelevant and stripping twice changes nothing.
pub fn strip_code_fences(text: &str) -> &str {
    let mut rest = text.trim();
    loop {
        let before = rest;
        if let Some(m) = opening_fence().find(rest) {
            rest = rest[m.end()..].trim();
        }
        if let Some(m) = closing_fence().find(rest) {
            rest = rest[..m.start()].trim();
        }
        if rest.len() == before.len() {
            return rest;
        }
    }
}

/// Text of the first candidate's first content part.
pub fn first_candidate_text(body: &str) -> Result<String> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(TruthGuardError::EmptyCandidates)?;
    candidate
        .content
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| TruthGuardError::InvalidResult("first candidate has no text part".into()))
}

/// Turn a successful provider body into a typed result.
pub fn extract_result(kind: InputKind, body: &str) -> Result<AnalysisResult> {
    let raw = first_candidate_text(body)?;
    AnalysisResult::decode(kind, strip_code_fences(&raw))
}
