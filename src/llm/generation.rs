//! Generation client used by the chain executor.
//!
//! Wraps an [`LLMClient`] with the contract every chain step relies on:
//!
//! - an empty API key is rejected before any provider call
//! - the three prompt segments are composed under labelled headers
//! - the token count is an estimate (`ceil(chars / 4)` of the composed
//!   prompt), not a tokenizer count
//! - provider failures come back as [`GenerationOutcome::Failure`] instead of
//!   an error, so a chain step always has an output

use crate::llm::client::{LLMClient, ProviderRequest};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Prefix of the rendered text for a failed generation.
pub const ERROR_PREFIX: &str = "Error generating content:";

/// Substituted when the provider succeeds without returning any text.
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response generated.";

const UNKNOWN_ERROR: &str = "Unknown error";

/// Inputs of one generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub api_key: &'a str,
    pub model: &'a str,
    pub system_prompt: &'a str,
    pub user_prompt: &'a str,
    pub context: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Result of one generation call, tagged so callers can tell real output from
/// a provider failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Success { text: String, tokens: u64 },
    Failure { reason: String },
}

impl GenerationOutcome {
    /// Estimated tokens; zero for failures
    pub fn tokens(&self) -> u64 {
        match self {
            GenerationOutcome::Success { tokens, .. } => *tokens,
            GenerationOutcome::Failure { .. } => 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, GenerationOutcome::Failure { .. })
    }
}

pub(crate) fn render_failure(reason: &str) -> String {
    format!("{} {}", ERROR_PREFIX, reason)
}

/// Compose the prompt sent to the provider.
///
/// Each segment sits under its own header so the provider can tell the
/// instructions apart from the (possibly very long) context data.
pub fn compose_prompt(system_prompt: &str, user_prompt: &str, context: &str) -> String {
    format!(
        "SYSTEM INSTRUCTION:\n{}\n\nUSER INSTRUCTION:\n{}\n\nCONTEXT DATA:\n{}",
        system_prompt, user_prompt, context
    )
}

/// Rough token estimate: one token per four characters, rounded up.
pub fn estimate_tokens(prompt: &str) -> u64 {
    (prompt.chars().count() as u64).div_ceil(4)
}

/// The per-step generation call a chain executor depends on
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce one step's output.
    ///
    /// Provider failures come back as `Ok(GenerationOutcome::Failure)`; an
    /// `Err` means the request itself was unusable.
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<GenerationOutcome>;

    /// Provider label recorded in execution metrics
    fn provider_name(&self) -> &str;
}

/// Generation client shared by every step of a chain run
#[derive(Clone)]
pub struct GenerationClient {
    llm: Arc<dyn LLMClient>,
    request_timeout: Option<Duration>,
}

impl GenerationClient {
    /// Create a client without a request timeout
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self {
            llm,
            request_timeout: None,
        }
    }

    /// Bound each provider call; `None` waits indefinitely
    pub fn with_timeout(mut self, request_timeout: Option<Duration>) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn provider_name(&self) -> &str {
        self.llm.provider_name()
    }

    /// Run one generation call.
    ///
    /// # Errors
    ///
    /// Only `AppError::Configuration` when the API key is empty. Every
    /// provider-side problem is reported as `Ok(GenerationOutcome::Failure)`.
    pub async fn generate(&self, request: &GenerationRequest<'_>) -> Result<GenerationOutcome> {
        if request.api_key.trim().is_empty() {
            return Err(AppError::Configuration("API Key is required".to_string()));
        }

        let prompt = compose_prompt(request.system_prompt, request.user_prompt, request.context);
        let tokens = estimate_tokens(&prompt);

        let provider_request = ProviderRequest {
            api_key: request.api_key.to_string(),
            model: request.model.to_string(),
            prompt,
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        };

        let call = self.llm.complete(&provider_request);
        let result = match self.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(AppError::LLM(format!(
                    "Request timed out after {:.1}s",
                    limit.as_secs_f64()
                ))),
            },
            None => call.await,
        };

        match result {
            Ok(text) => Ok(GenerationOutcome::Success {
                text: text
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string()),
                tokens,
            }),
            Err(e) => {
                tracing::error!(provider = self.llm.provider_name(), model = request.model, "Generation failed: {}", e);
                Ok(GenerationOutcome::Failure {
                    reason: failure_reason(e),
                })
            }
        }
    }
}

#[async_trait]
impl Generator for GenerationClient {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<GenerationOutcome> {
        GenerationClient::generate(self, request).await
    }

    fn provider_name(&self) -> &str {
        GenerationClient::provider_name(self)
    }
}

fn failure_reason(err: AppError) -> String {
    let message = match err {
        AppError::LLM(msg) => msg,
        other => other.to_string(),
    };
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}
