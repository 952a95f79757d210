//! Request formatting: fixed instructions plus the caller's content.

use crate::provider::{Content, GenerateContentRequest, Part};
use crate::types::{AnalysisRequest, InputKind};

const TEXT_PROMPT_HEAD: &str = r#"You are a fraud detection expert. Analyze the following conversation text for signs of scams, social engineering, or phishing.

Text to analyze:
""#;

const TEXT_PROMPT_TAIL: &str = r#""

Return ONLY a valid JSON object with the following structure (do not include markdown ticks):
{
    "riskScore": (integer 0-100, where 100 is definite scam),
    "riskLevel": (string, e.g., "Low", "Medium", "High", "Critical"),
    "category": (string, e.g., "Phishing", "Pig Butchering", "Emotional Blackmail", "Safe"),
    "summary": (string, a concise summary of why this is or isn't a scam, in Traditional Chinese),
    "anomalies": (array of strings, listing specific suspicious points in Traditional Chinese),
    "recommendations": (array of strings, advice for the user in Traditional Chinese)
}"#;

pub const IMAGE_PROMPT: &str = r#"Analyze the provided image and determine if it is AI-generated or Real.

Key distinction:
- **Real**: Natural imperfections, film grain, complex physics, standard digital photography noise. INCLUDES photos with beauty filters or color correction.
- **AI-Generated**: Structural logic errors, impossible physics, hyper-realistic "plastic" skin texture without pores, merging objects.

Output Requirement:
- Be objective. Do not be overly skeptical.
- If it looks like a standard social media photo (even with filters), it is likely Real.

Return ONLY a valid JSON object (Language: Traditional Chinese):
{
    "isSafe": (boolean, TRUE = Real/Filtered, FALSE = AI-Generated),
    "riskScore": (integer 0-100. 0-40=Real, 41-70=Suspicious, 71-100=AI),
    "riskLevel": (string, "低風險", "中風險", "高風險"),
    "summary": (string, A natural, professional explanation of the finding. "這張照片看起來是真實的..." or "檢測到AI生成的特徵..."),
    "faceAnalysis": (string, specific details about eyes/skin/mouth),
    "lightingAnalysis": (string, comments on light/shadow consistency),
    "artifactAnalysis": (string, strictly identifying AI artifacts if any)
}"#;

/// Fraud-screening prompt with the transcript embedded verbatim.
pub fn text_prompt(text: &str) -> String {
    let mut prompt = String::with_capacity(TEXT_PROMPT_HEAD.len() + text.len() + TEXT_PROMPT_TAIL.len());
    prompt.push_str(TEXT_PROMPT_HEAD);
    prompt.push_str(text);
    prompt.push_str(TEXT_PROMPT_TAIL);
    prompt
}

/// Build the `generateContent` body for a request.
///
/// The body does not depend on the target model, so one payload serves every
/// candidate.
pub fn build_request(request: &AnalysisRequest) -> GenerateContentRequest {
    let parts = match request.kind() {
        InputKind::Text => vec![Part::text(text_prompt(request.payload()))],
        InputKind::Image => vec![
            Part::text(IMAGE_PROMPT),
            Part::inline_data(
                request.mime_type().unwrap_or(crate::types::DEFAULT_IMAGE_MIME),
                request.payload(),
            ),
        ],
    };
    GenerateContentRequest {
        contents: vec![Content { parts }],
    }
}
