//! Model probing: one attempt per candidate until something answers.

use std::time::Duration;

use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

use crate::error::{DiscoveryError, ProbeFailure, Result, TruthGuardError};
use crate::models::{CandidateOrigin, CandidateSource, DiscoveryFilter};
use crate::provider::{GenerateContentRequest, ModelTransport};

/// The first successful provider call.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Model that answered.
    pub model: String,
    pub origin: CandidateOrigin,
    /// Raw success body, not yet decoded.
    pub body: String,
    /// Failures recorded before the success, in attempt order.
    pub failures: Vec<ProbeFailure>,
}

/// Walks the priority list, then the discovered list, strictly one call at a time.
pub struct ModelProber<'a> {
    transport: &'a dyn ModelTransport,
    priority: Vec<String>,
    discovery: Option<DiscoveryFilter>,
    budget: Option<Duration>,
}

impl<'a> ModelProber<'a> {
    pub fn new(transport: &'a dyn ModelTransport, priority: Vec<String>) -> Self {
        Self {
            transport,
            priority,
            discovery: None,
            budget: None,
        }
    }

    /// Enable the listing fallback with the given filter.
    pub fn with_discovery(mut self, filter: DiscoveryFilter) -> Self {
        self.discovery = Some(filter);
        self
    }

    /// Bound the whole run, listing included. Running out of time is `TimedOut`.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Send `request` to each candidate in turn and return the first success.
    ///
    /// Errors:
    /// - `ProbeExhausted` when discovery is disabled and every priority model failed;
    /// - `Discovery` when the listing failed or no discovered model worked;
    /// - `TimedOut` when the budget ran out first.
    pub async fn run(self, request: &GenerateContentRequest) -> Result<Invocation> {
        let transport = self.transport;
        let budget = self.budget;
        let deadline = budget.map(|b| Instant::now() + b);
        let mut source = CandidateSource::new(transport, self.priority, self.discovery);
        let mut failures: Vec<ProbeFailure> = Vec::new();

        loop {
            let next = match within(deadline, source.next()).await {
                Some(next) => next?,
                None => return Err(timed_out(budget, failures)),
            };
            let Some(candidate) = next else { break };
            debug!(model = %candidate.model, origin = %candidate.origin, "Probing model");

            let attempt = within(deadline, transport.generate_content(&candidate.model, request));
            let Some(outcome) = attempt.await else {
                warn!(model = %candidate.model, "Analysis budget exhausted mid-attempt");
                failures.push(ProbeFailure::new(candidate.model, "timed out"));
                return Err(timed_out(budget, failures));
            };
            match outcome {
                Ok(body) => {
                    info!(
                        model = %candidate.model,
                        origin = %candidate.origin,
                        failed_before = failures.len(),
                        "Model answered"
                    );
                    return Ok(Invocation {
                        model: candidate.model,
                        origin: candidate.origin,
                        body,
                        failures,
                    });
                }
                Err(err) => {
                    let reason = failure_reason(&err);
                    warn!(model = %candidate.model, %reason, "Model attempt failed");
                    failures.push(ProbeFailure::new(candidate.model, reason));
                }
            }
        }

        Err(match source.discovered() {
            Some(available) => DiscoveryError::NoWorkingModel {
                available: available.to_vec(),
                failures,
            }
            .into(),
            None => TruthGuardError::ProbeExhausted { failures },
        })
    }
}

/// Await `fut` unless `deadline` passes first.
async fn within<F: std::future::Future>(deadline: Option<Instant>, fut: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => timeout(deadline.saturating_duration_since(Instant::now()), fut)
            .await
            .ok(),
        None => Some(fut.await),
    }
}

fn timed_out(budget: Option<Duration>, failures: Vec<ProbeFailure>) -> TruthGuardError {
    TruthGuardError::TimedOut {
        secs: budget.map_or(0, |b| b.as_secs()),
        failures,
    }
}

fn failure_reason(err: &TruthGuardError) -> String {
    match err {
        TruthGuardError::Api { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
