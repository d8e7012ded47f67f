//! Agent definitions
//!
//! An agent is one prompt-configured step of the review chain. The chain runs
//! agents strictly in list order, so the order of an agent list is part of
//! its meaning.

pub mod defaults;
pub mod registry;

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};

pub use defaults::{default_agents, DEFAULT_MODEL};
pub use registry::AgentStore;

/// Configuration of a single chain step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Stable identifier, unique within a list
    pub id: String,

    /// Display name; also labels this step's output in the chain context
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// System instruction sent ahead of the user instruction
    pub system_prompt: String,

    /// User instruction sent ahead of the context data
    pub user_prompt: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature, recommended range [0, 1]
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum output tokens requested from the provider
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

impl AgentSpec {
    /// Create an agent with the default model and sampling settings
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Check the fields a provider call depends on.
    ///
    /// Temperatures above 1.0 are accepted with a warning; providers differ
    /// on the upper bound.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::Validation("Agent id must not be empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Agent '{}' must have a name",
                self.id
            )));
        }
        if self.model.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Agent '{}' must specify a model",
                self.id
            )));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(AppError::Validation(format!(
                "Agent '{}' has invalid temperature {}",
                self.id, self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(AppError::Validation(format!(
                "Agent '{}' must allow at least one output token",
                self.id
            )));
        }
        if self.temperature > 1.0 {
            tracing::warn!(
                agent = %self.id,
                temperature = self.temperature,
                "Temperature above the recommended range [0, 1]"
            );
        }
        Ok(())
    }
}
