//! Lazy candidate sequence: priority list first, then discovered models.

use std::collections::HashSet;

use strum::Display;
use tracing::info;

use crate::error::{DiscoveryError, Result, TruthGuardError};
use crate::provider::ModelTransport;

use super::discovery::DiscoveryFilter;

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CandidateOrigin {
    Priority,
    Discovered,
}

/// One model identifier to attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub model: String,
    pub origin: CandidateOrigin,
}

enum Phase {
    Priority,
    Discovered { available: Vec<String>, cursor: usize },
    Exhausted,
}

/// Finite, non-restartable sequence of candidates.
///
/// Yields the priority list in order. Once that runs dry (and only then) the
/// provider's listing is fetched a single time, filtered, and anything not
/// already yielded is handed out next. No identifier is yielded twice.
pub struct CandidateSource<'a> {
    transport: &'a dyn ModelTransport,
    priority: std::vec::IntoIter<String>,
    filter: Option<DiscoveryFilter>,
    yielded: HashSet<String>,
    phase: Phase,
}

impl<'a> CandidateSource<'a> {
    /// `filter: None` disables discovery.
    pub fn new(
        transport: &'a dyn ModelTransport,
        priority: Vec<String>,
        filter: Option<DiscoveryFilter>,
    ) -> Self {
        Self {
            transport,
            priority: priority.into_iter(),
            filter,
            yielded: HashSet::new(),
            phase: Phase::Priority,
        }
    }

    /// Next candidate, `None` once everything is used up.
    ///
    /// May issue the listing call; a failed listing is a `DiscoveryError`.
    pub async fn next(&mut self) -> Result<Option<Candidate>> {
        loop {
            match &mut self.phase {
                Phase::Priority => {
                    if let Some(model) = self.priority.next() {
                        if self.yielded.insert(model.clone()) {
                            return Ok(Some(Candidate {
                                model,
                                origin: CandidateOrigin::Priority,
                            }));
                        }
                        continue;
                    }
                    self.phase = match self.filter.take() {
                        Some(filter) => {
                            let available = self.discover(&filter).await?;
                            Phase::Discovered {
                                available,
                                cursor: 0,
                            }
                        }
                        None => Phase::Exhausted,
                    };
                }
                Phase::Discovered { available, cursor } => {
                    while let Some(model) = available.get(*cursor) {
                        *cursor += 1;
                        if self.yielded.insert(model.clone()) {
                            return Ok(Some(Candidate {
                                model: model.clone(),
                                origin: CandidateOrigin::Discovered,
                            }));
                        }
                    }
                    return Ok(None);
                }
                Phase::Exhausted => return Ok(None),
            }
        }
    }

    /// Models the listing offered, once discovery has run.
    pub fn discovered(&self) -> Option<&[String]> {
        match &self.phase {
            Phase::Discovered { available, .. } => Some(available),
            _ => None,
        }
    }

    async fn discover(&self, filter: &DiscoveryFilter) -> Result<Vec<String>> {
        info!(
            provider = self.transport.provider_name(),
            "Priority models exhausted, listing available models"
        );
        let listed = self.transport.list_models().await.map_err(|err| match err {
            TruthGuardError::Api { status, message } => {
                DiscoveryError::ListingFailed { status, message }
            }
            other => DiscoveryError::ListingUnreachable(other.to_string()),
        })?;

        let available: Vec<String> = filter
            .apply(&listed)
            .into_iter()
            .map(|c| c.identifier)
            .collect();
        info!(
            listed = listed.len(),
            capable = available.len(),
            "Model discovery finished"
        );
        Ok(available)
    }
}
