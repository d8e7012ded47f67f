// ============= Error Types =============

/// Errors surfaced by the chain executor and its collaborators.
///
/// Provider failures (`LLM`) are produced by [`crate::llm::LLMClient`]
/// implementations but never escape a chain run: the generation client turns
/// them into a failed step and the chain moves on.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("A chain run is already in progress")]
    ConcurrentRun,

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Cannot average over zero metrics")]
    DivisionByZero,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::utils::config::ConfigError> for AppError {
    fn from(err: crate::utils::config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
