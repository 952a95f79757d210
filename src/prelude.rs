//! Common imports.

pub use crate::config::GuardConfig;
pub use crate::error::{Result, TruthGuardError};
pub use crate::generation::{Analysis, Analyzer};
pub use crate::provider::ModelTransport;
pub use crate::types::{AnalysisRequest, AnalysisResult, ImageAnalysis, InputKind, TextAnalysis};
