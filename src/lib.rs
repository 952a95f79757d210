//! TruthGuard: scam and deepfake risk assessment backed by Gemini.
//!
//! Submits a chat transcript or an image to a generative model and decodes
//! the model's JSON verdict into a typed result. Model availability on the
//! provider side drifts, so each call walks a priority list of known models
//! and, if they all fail, falls back to the provider's model listing.
//!
//! # Quick Start
//!
//! ```no_run
//! use truthguard::prelude::*;
//!
//! # async fn example() -> truthguard::error::Result<()> {
//! let analyzer = Analyzer::from_config(GuardConfig::load()?)?;
//! let verdict = analyzer.analyze_text("Your parcel is held, pay the fee at this link").await?;
//! println!("risk {}: {}", verdict.risk_score, verdict.summary);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod types;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;
