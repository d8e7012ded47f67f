//! TOML configuration for review-chain
//!
//! The configuration file (`review-chain.toml`) names the provider, where to
//! find its API key, and optionally replaces the built-in agent list.
//!
//! ```toml
//! [runtime]
//! log_level = "info"
//! log_format = "pretty"
//!
//! [provider]
//! type = "gemini"
//! api_key_env = "GEMINI_API_KEY"
//! request_timeout_secs = 120
//!
//! [[agents]]
//! id = "1"
//! name = "Extraction"
//! system_prompt = "..."
//! user_prompt = "..."
//! ```
//!
//! Secrets never live in the file: `api_key_env` names the environment
//! variable that holds the key.

use crate::agents::{AgentSpec, AgentStore};
use crate::llm::client::{Provider, DEFAULT_GEMINI_API_BASE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "review-chain.toml";

/// Root configuration structure loaded from review-chain.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    /// Agent list; the built-in pipeline is used when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<AgentSpec>,
}

// ============= Runtime Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Default tracing filter; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        /// Environment variable name containing the API key
        #[serde(default = "default_gemini_api_key_env")]
        api_key_env: String,

        #[serde(default = "default_gemini_api_base")]
        api_base: String,

        /// Per-request timeout; 0 disables it
        #[serde(default = "default_request_timeout_secs")]
        request_timeout_secs: u64,
    },
}

fn default_gemini_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_gemini_api_base() -> String {
    DEFAULT_GEMINI_API_BASE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Gemini {
            api_key_env: default_gemini_api_key_env(),
            api_base: default_gemini_api_base(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn api_key_env(&self) -> &str {
        match self {
            ProviderConfig::Gemini { api_key_env, .. } => api_key_env,
        }
    }

    /// Timeout applied to each generation call, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        match self {
            ProviderConfig::Gemini {
                request_timeout_secs,
                ..
            } => (*request_timeout_secs > 0).then(|| Duration::from_secs(*request_timeout_secs)),
        }
    }

    /// Provider to build a client from
    pub fn provider(&self) -> Provider {
        match self {
            ProviderConfig::Gemini { api_base, .. } => Provider::Gemini {
                api_base: api_base.clone(),
            },
        }
    }
}

// ============= Errors =============

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl ChainConfig {
    /// Load and validate configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;

        tracing::debug!(path = %path.display(), agents = config.agents.len(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ChainConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::FileNotFound(path)) => {
                tracing::info!(
                    path = %path.display(),
                    "Configuration file not found, using defaults"
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Validate agents and provider settings.
    ///
    /// The API key variable is not checked here; a key can also be passed on
    /// the command line.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for agent in &self.agents {
            agent
                .validate()
                .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
            if !seen.insert(agent.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Agent id '{}' is defined more than once",
                    agent.id
                )));
            }
        }

        match &self.provider {
            ProviderConfig::Gemini {
                api_key_env,
                api_base,
                ..
            } => {
                if api_key_env.trim().is_empty() {
                    return Err(ConfigError::ValidationError(
                        "provider.api_key_env must not be empty".to_string(),
                    ));
                }
                if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
                    return Err(ConfigError::ValidationError(format!(
                        "provider.api_base must be an http(s) URL, got '{}'",
                        api_base
                    )));
                }
            }
        }

        Ok(())
    }

    /// Get the API key from the environment
    pub fn api_key(&self) -> Result<String, ConfigError> {
        let name = self.provider.api_key_env();
        std::env::var(name)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
    }

    /// Agent store for this configuration; the built-in pipeline when no
    /// agents are configured
    pub fn agent_store(&self) -> Result<AgentStore, ConfigError> {
        if self.agents.is_empty() {
            return Ok(AgentStore::with_defaults());
        }
        AgentStore::new(self.agents.clone()).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.provider.request_timeout()
    }
}
