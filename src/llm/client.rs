//! LLM client abstraction
//!
//! The chain executor talks to exactly one kind of provider call: send a fully
//! composed prompt with generation parameters, get text back. Providers
//! implement [`LLMClient`]; [`Provider`] selects an implementation at runtime.

use crate::types::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Provider-level request for a single generation call.
///
/// The prompt is already composed (instructions plus context); providers send
/// it as a single user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// API key used to authenticate with the provider
    pub api_key: String,
    /// Model identifier (e.g. `gemini-2.5-flash`)
    pub model: String,
    /// The fully composed prompt
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum number of output tokens
    pub max_output_tokens: u32,
}

/// Generic LLM client trait for provider abstraction
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Run one generation call.
    ///
    /// Returns `Ok(None)` when the provider answered successfully but produced
    /// no text. Any transport, authentication, quota or decoding problem is an
    /// `Err`.
    async fn complete(&self, request: &ProviderRequest) -> Result<Option<String>>;

    /// Human-readable provider label recorded in execution metrics
    fn provider_name(&self) -> &str;
}

/// Default Gemini REST endpoint base
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Provider enum for runtime selection
#[derive(Debug, Clone, PartialEq)]
pub enum Provider {
    /// Google Gemini `generateContent` REST API
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Gemini {
    ///     api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
    /// };
    /// ```
    Gemini { api_base: String },
}

impl Default for Provider {
    fn default() -> Self {
        Provider::Gemini {
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
        }
    }
}

impl Provider {
    /// Create a client instance for this provider
    pub fn create_client(&self) -> Result<Arc<dyn LLMClient>> {
        match self {
            Provider::Gemini { api_base } => Ok(Arc::new(super::gemini::GeminiClient::new(
                api_base.clone(),
            )?)),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini { .. } => "Gemini",
        }
    }
}
