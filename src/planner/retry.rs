use std::time::Duration;

use tracing::{info, warn};

use super::generate::ItineraryGenerator;
use super::parse;
use crate::error::PlanError;
use crate::models::ItineraryDocument;

/// Attempt budget for one itinerary request.
pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Linear backoff: the n-th failed attempt waits n * base_delay.
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Explicit retry state. Logging hangs off the transitions; the control
/// flow itself is just this machine.
enum RetryState {
    Attempting { attempt: u32 },
    Retrying { attempt: u32, last: PlanError },
    Success { attempt: u32, document: ItineraryDocument },
    Exhausted { attempts: u32, last: PlanError },
}

/// Runs generate -> parse under the bounded-attempt policy. Transient and
/// schema failures consume an attempt and back off; fatal failures abort
/// immediately. The caller passes the already-built prompt, which is reused
/// verbatim on every attempt.
pub async fn generate_with_retry(
    generator: &dyn ItineraryGenerator,
    prompt: &str,
    expected_days: u32,
    policy: &RetryPolicy,
) -> Result<ItineraryDocument, PlanError> {
    let mut state = RetryState::Attempting { attempt: 1 };
    loop {
        state = match state {
            RetryState::Attempting { attempt } => {
                match run_attempt(generator, prompt, expected_days).await {
                    Ok(document) => RetryState::Success { attempt, document },
                    Err(err) if !err.is_retryable() => return Err(err),
                    Err(err) if attempt < policy.max_attempts => {
                        RetryState::Retrying { attempt, last: err }
                    }
                    Err(err) => RetryState::Exhausted {
                        attempts: attempt,
                        last: err,
                    },
                }
            }
            RetryState::Retrying { attempt, last } => {
                let delay = policy.backoff(attempt);
                warn!(
                    "Attempt {}/{} failed ({}), retrying in {:?}",
                    attempt, policy.max_attempts, last, delay
                );
                tokio::time::sleep(delay).await;
                RetryState::Attempting {
                    attempt: attempt + 1,
                }
            }
            RetryState::Success { attempt, document } => {
                info!("Itinerary generated on attempt {}", attempt);
                return Ok(document);
            }
            RetryState::Exhausted { attempts, last } => {
                warn!("Retry budget exhausted after {} attempts", attempts);
                return Err(PlanError::Exhausted {
                    attempts,
                    last: last.to_string(),
                });
            }
        };
    }
}

async fn run_attempt(
    generator: &dyn ItineraryGenerator,
    prompt: &str,
    expected_days: u32,
) -> Result<ItineraryDocument, PlanError> {
    let raw = generator.generate(prompt).await?;
    parse::parse_itinerary(&raw, expected_days)
}
