//! LLM Provider Clients and Abstractions
//!
//! # Architecture
//!
//! - [`LLMClient`] - The provider seam: one composed prompt in, text out
//! - [`Provider`] - Runtime provider selection (Gemini)
//! - [`Generator`] - What a chain step calls
//! - [`GenerationClient`] - The [`Generator`] over an [`LLMClient`]: key check,
//!   prompt composition, token estimate, timeout, failure capture
//!
//! # Example
//!
//! ```ignore
//! use review_chain::llm::{GenerationClient, GenerationOutcome, GenerationRequest, Provider};
//!
//! let client = GenerationClient::new(Provider::default().create_client()?);
//! let outcome = client
//!     .generate(&GenerationRequest {
//!         api_key: &api_key,
//!         model: "gemini-2.5-flash",
//!         system_prompt: "You are a regulatory reviewer.",
//!         user_prompt: "Summarise the submission:",
//!         context: &document_text,
//!         temperature: 0.2,
//!         max_tokens: 1500,
//!     })
//!     .await?;
//! if let GenerationOutcome::Success { text, tokens } = outcome {
//!     println!("{} (~{} tokens)", text, tokens);
//! }
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// Gemini REST client.
pub mod gemini;
/// Generation client with the per-step contract used by the chain executor.
pub mod generation;

pub use client::{LLMClient, Provider, ProviderRequest};
pub use generation::{
    compose_prompt, estimate_tokens, GenerationClient, GenerationOutcome, GenerationRequest,
    Generator,
};
