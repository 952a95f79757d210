//! Core types for TruthGuard.

pub mod analysis;
pub mod request;

pub use analysis::*;
pub use request::*;
