use async_trait::async_trait;
use rig::completion::{CompletionError, Prompt, PromptError};
use rig::providers::openrouter;
use tracing::debug;

use crate::error::PlanError;

const SYSTEM_PREAMBLE: &str = "You are an expert AI travel concierge. You always respond with valid JSON only, never markdown code blocks.";

/// Seam to the generative-language service. The production implementation
/// is the only place in the crate that talks to the model; tests substitute
/// stubs.
#[async_trait]
pub trait ItineraryGenerator: Send + Sync {
    /// Returns the raw model text, or `Transient`/`Fatal` on failure.
    async fn generate(&self, prompt: &str) -> Result<String, PlanError>;
}

/// Drives the language model through OpenRouter.
pub struct OpenRouterGenerator {
    api_key: String,
    model: String,
}

impl OpenRouterGenerator {
    pub fn new(api_key: String, model: String) -> Self {
        Self { api_key, model }
    }
}

#[async_trait]
impl ItineraryGenerator for OpenRouterGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, PlanError> {
        let client = openrouter::Client::new(&self.api_key);
        let agent = client.agent(&self.model).preamble(SYSTEM_PREAMBLE).build();

        debug!("Invoking generation model {}", self.model);
        agent.prompt(prompt.to_string()).await.map_err(classify_error)
    }
}

/// Maps a provider failure onto the retry taxonomy: transport/availability
/// problems are worth another attempt, credential and quota problems are not.
fn classify_error(err: PromptError) -> PlanError {
    match err {
        PromptError::CompletionError(completion_err) => match completion_err {
            CompletionError::HttpError(e) => PlanError::Transient(e.to_string()),
            CompletionError::ProviderError(msg) => {
                if is_fatal_provider_message(&msg) {
                    PlanError::Fatal(msg)
                } else {
                    PlanError::Transient(msg)
                }
            }
            other => PlanError::Fatal(other.to_string()),
        },
        other => PlanError::Fatal(other.to_string()),
    }
}

fn is_fatal_provider_message(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    [
        "unauthorized",
        "forbidden",
        "invalid api key",
        "api key",
        "quota",
        "credit",
        "401",
        "403",
        "402",
    ]
    .iter()
    .any(|marker| lower.contains(marker))
}
