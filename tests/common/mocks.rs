//! Mock implementations for testing.
//!
//! This module provides a scripted LLM client and a scripted generator that
//! can be used across different test files without duplication.

#![allow(dead_code)]

use async_trait::async_trait;
use review_chain::llm::client::{LLMClient, ProviderRequest};
use review_chain::llm::{compose_prompt, GenerationOutcome, GenerationRequest, Generator};
use review_chain::types::{AppError, Result};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// One scripted provider answer
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    /// Successful call with no text
    Empty,
    Fail(String),
}

impl MockReply {
    pub fn text(text: &str) -> Self {
        MockReply::Text(text.to_string())
    }

    pub fn fail(message: &str) -> Self {
        MockReply::Fail(message.to_string())
    }
}

/// Mock LLM client for testing with configurable responses.
///
/// Scripted replies are consumed in call order; once the script runs out the
/// fallback reply is used. Every request is recorded so tests can inspect
/// the prompts each step was sent.
///
/// # Examples
///
/// ```ignore
/// // Always answers with the same text
/// let client = MockLLMClient::new("Hello, world!");
///
/// // Answers each call in turn
/// let client = MockLLMClient::scripted(vec![MockReply::text("A"), MockReply::fail("quota")]);
///
/// // Always fails
/// let client = MockLLMClient::failing();
/// ```
pub struct MockLLMClient {
    script: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    requests: Mutex<Vec<ProviderRequest>>,
    delay: Option<Duration>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self::with_fallback(Vec::new(), MockReply::text(response))
    }

    /// Create a mock client that answers each call from `replies` in order.
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        Self::with_fallback(replies, MockReply::text("unscripted reply"))
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self::with_fallback(Vec::new(), MockReply::fail("Mock LLM failure"))
    }

    fn with_fallback(replies: Vec<MockReply>, fallback: MockReply) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            fallback,
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.prompt).collect()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn complete(&self, request: &ProviderRequest) -> Result<Option<String>> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            MockReply::Text(text) => Ok(Some(text)),
            MockReply::Empty => Ok(None),
            MockReply::Fail(message) => Err(AppError::LLM(message)),
        }
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }
}

/// Mock generator that answers each step with a scripted outcome.
///
/// Sits above the token estimate, so tests control the token count each
/// step reports. Composed prompts are recorded in call order.
pub struct MockGenerator {
    script: Mutex<VecDeque<GenerationOutcome>>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    /// Answer with `(text, tokens)` pairs in call order.
    pub fn replying(replies: &[(&str, u64)]) -> Self {
        Self::scripted(
            replies
                .iter()
                .map(|(text, tokens)| GenerationOutcome::Success {
                    text: text.to_string(),
                    tokens: *tokens,
                })
                .collect(),
        )
    }

    pub fn scripted(outcomes: Vec<GenerationOutcome>) -> Self {
        Self {
            script: Mutex::new(outcomes.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<GenerationOutcome> {
        self.prompts.lock().unwrap().push(compose_prompt(
            request.system_prompt,
            request.user_prompt,
            request.context,
        ));

        Ok(self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| GenerationOutcome::Failure {
                reason: "unscripted call".to_string(),
            }))
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }
}
