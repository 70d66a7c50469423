use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::catalog::{self, CandidateList};
use crate::config::DEFAULT_ATTEMPT_TIMEOUT_MS;
use crate::core::error::{ConfigError, ProviderError, RoutingError, TranslateError};
use crate::core::traits::ProviderAdapter;
use crate::core::types::{AttemptOutcome, Candidate, PromptMessages, TranslationResult};
use crate::providers::normalize_sentence;
use crate::registry::AdapterRegistry;

/// Sequential first-success-wins router over an ordered candidate list.
///
/// At most one outbound call is in flight per `route` invocation. Each
/// candidate gets exactly one bounded attempt; an explicitly selected
/// candidate is tried first and skipped in the ordered pass.
pub struct FallbackRouter {
    registry: AdapterRegistry,
    candidates: CandidateList,
    attempt_timeout: Duration,
}

pub struct FallbackRouterBuilder {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
    candidates: CandidateList,
    attempt_timeout_ms: u64,
}

impl FallbackRouter {
    pub fn builder() -> FallbackRouterBuilder {
        FallbackRouterBuilder {
            adapters: Vec::new(),
            candidates: catalog::builtin_candidates(),
            attempt_timeout_ms: DEFAULT_ATTEMPT_TIMEOUT_MS,
        }
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Ordered attempts for one request. Unknown selections are rejected here,
    /// before any network activity.
    pub fn attempt_plan(&self, selected: Option<&str>) -> Result<Vec<Arc<Candidate>>, RoutingError> {
        let selected = match selected {
            Some(id) => Some(Arc::clone(self.candidates.resolve(id).ok_or_else(|| {
                RoutingError::UnknownCandidate {
                    candidate: id.to_string(),
                }
            })?)),
            None => None,
        };

        let mut plan = Vec::with_capacity(self.candidates.len());
        if let Some(selected) = &selected {
            plan.push(Arc::clone(selected));
        }
        plan.extend(
            self.candidates
                .iter()
                .filter(|candidate| {
                    selected
                        .as_ref()
                        .is_none_or(|selected| selected.id != candidate.id)
                })
                .cloned(),
        );

        Ok(plan)
    }

    pub async fn route(
        &self,
        messages: &PromptMessages,
        selected: Option<&str>,
    ) -> Result<TranslationResult, TranslateError> {
        let plan = self.attempt_plan(selected)?;
        let mut failures = Vec::with_capacity(plan.len());

        for (index, candidate) in plan.iter().enumerate() {
            let started = Instant::now();
            let outcome = self.attempt(candidate, messages).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match outcome {
                AttemptOutcome::Success { text, candidate } => {
                    info!(
                        attempt = index + 1,
                        provider = %candidate.provider,
                        model = %candidate.model,
                        elapsed_ms,
                        "translation attempt succeeded"
                    );
                    return Ok(TranslationResult {
                        text,
                        provider: candidate.provider.clone(),
                        model: candidate.model.clone(),
                    });
                }
                failure => {
                    log_failed_attempt(index + 1, elapsed_ms, &failure);
                    failures.push(failure);
                }
            }
        }

        warn!(
            attempts = failures.len(),
            outcomes = %summarize(&failures),
            "all translation candidates failed"
        );
        Err(TranslateError::Exhausted {
            attempts: failures.len(),
        })
    }

    /// One bounded attempt. A reply arriving after the deadline is dropped
    /// with the abandoned future.
    pub async fn attempt(
        &self,
        candidate: &Arc<Candidate>,
        messages: &PromptMessages,
    ) -> AttemptOutcome {
        let Some(adapter) = self.registry.resolve(candidate.request_shape) else {
            return AttemptOutcome::TransportError {
                candidate: Arc::clone(candidate),
                cause: ProviderError::Transport {
                    provider: candidate.provider.clone(),
                    model: candidate.model.clone(),
                    message: format!("no adapter registered for {}", candidate.request_shape),
                },
            };
        };

        match tokio::time::timeout(self.attempt_timeout, adapter.run(candidate, messages)).await {
            Err(_elapsed) => AttemptOutcome::Timeout {
                candidate: Arc::clone(candidate),
            },
            Ok(Err(cause)) => AttemptOutcome::TransportError {
                candidate: Arc::clone(candidate),
                cause,
            },
            Ok(Ok(text)) => match text.as_deref().and_then(normalize_sentence) {
                Some(text) => AttemptOutcome::Success {
                    text,
                    candidate: Arc::clone(candidate),
                },
                None => AttemptOutcome::NoContent {
                    candidate: Arc::clone(candidate),
                },
            },
        }
    }
}

impl FallbackRouterBuilder {
    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    pub fn with_candidates(mut self, candidates: CandidateList) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_attempt_timeout_ms(mut self, attempt_timeout_ms: u64) -> Self {
        self.attempt_timeout_ms = attempt_timeout_ms;
        self
    }

    pub fn build(self) -> Result<FallbackRouter, ConfigError> {
        if self.attempt_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout {
                timeout_ms: self.attempt_timeout_ms,
            });
        }
        if self.candidates.is_empty() {
            return Err(ConfigError::EmptyCandidateList);
        }

        let mut registry = AdapterRegistry::new();
        for adapter in self.adapters {
            registry.register(adapter);
        }
        registry.ensure_covers(&self.candidates)?;

        Ok(FallbackRouter {
            registry,
            candidates: self.candidates,
            attempt_timeout: Duration::from_millis(self.attempt_timeout_ms),
        })
    }
}

fn log_failed_attempt(attempt: usize, elapsed_ms: u64, outcome: &AttemptOutcome) {
    let candidate = outcome.candidate();
    match outcome {
        AttemptOutcome::TransportError { cause, .. } => warn!(
            attempt,
            provider = %candidate.provider,
            model = %candidate.model,
            elapsed_ms,
            outcome = outcome.label(),
            error = %cause,
            "translation attempt failed"
        ),
        _ => warn!(
            attempt,
            provider = %candidate.provider,
            model = %candidate.model,
            elapsed_ms,
            outcome = outcome.label(),
            "translation attempt failed"
        ),
    }
}

fn summarize(outcomes: &[AttemptOutcome]) -> String {
    outcomes
        .iter()
        .map(|outcome| format!("{}={}", outcome.candidate().id, outcome.label()))
        .collect::<Vec<_>>()
        .join(", ")
}
