//! Model candidates: priority lists, discovery filtering, and the candidate source.

pub mod discovery;
pub mod source;

pub use discovery::{strip_namespace, DiscoveryFilter, ModelCandidate};
pub use source::{Candidate, CandidateOrigin, CandidateSource};
