//! Request formatting, model probing, response extraction, and the analyzer.

pub mod analyzer;
pub mod convenience;
pub mod extract;
pub mod probe;
pub mod prompt;

pub use analyzer::{Analysis, Analyzer};
pub use convenience::{analyze_image, analyze_text};
pub use extract::{extract_result, strip_code_fences};
pub use probe::{Invocation, ModelProber};
pub use prompt::build_request;
