//! # review-chain
//!
//! Sequential agent chaining for document review. A document is passed through
//! an ordered list of prompt-configured agents; every agent sees the document
//! plus the labelled outputs of all agents before it, so the last agent can
//! consolidate the whole chain into one report.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use review_chain::{AgentStore, ChainExecutor, GenerationClient, Provider};
//!
//! #[tokio::main]
//! async fn main() -> review_chain::Result<()> {
//!     let client = GenerationClient::new(Provider::default().create_client()?);
//!     let executor = ChainExecutor::new(client, std::env::var("GEMINI_API_KEY").unwrap_or_default());
//!
//!     let store = AgentStore::with_defaults();
//!     let report = executor.execute("submission text...", store.agents()).await?;
//!
//!     println!("{}", report.to_markdown());
//!     Ok(())
//! }
//! ```
//!
//! ### Observing progress
//!
//! [`ChainExecutor::run`] returns a stream of [`RunState`] snapshots: one when
//! each step starts, one when it completes, and a final one once the chain is
//! done.
//!
//! ```rust,ignore
//! use futures::StreamExt;
//!
//! let mut run = executor.run(&text, store.agents(), None)?;
//! while let Some(state) = run.next().await {
//!     println!("step {:?}: {} metrics", state.current_step, state.metrics.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`agents`] - Agent definitions, the default pipeline and the ordered store
//! - [`llm`] - Provider seam, Gemini client and the generation contract
//! - [`workflows`] - The chain executor and its run snapshots
//! - [`metrics`] - Per-step metrics and aggregation
//! - [`report`] - Markdown report and review notes
//! - [`utils`] - TOML configuration
//! - [`types`] - Common error type

#![warn(rustdoc::missing_crate_level_docs)]

/// Agent definitions and the ordered agent store.
pub mod agents;
/// Command-line interface for the review-chain binary.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Execution metrics and aggregation.
pub mod metrics;
/// Markdown rendering and review notes.
pub mod report;
/// Core types (errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;
/// Chain executor.
pub mod workflows;

// Re-export commonly used types
pub use agents::{default_agents, AgentSpec, AgentStore};
pub use llm::{
    GenerationClient, GenerationOutcome, GenerationRequest, Generator, LLMClient, Provider,
};
pub use metrics::{ExecutionMetric, MetricsSummary};
pub use report::ReviewNotes;
pub use types::{AppError, Result};
pub use utils::config::{ChainConfig, ConfigError};
pub use workflows::{ChainExecutor, ChainReport, RunState, StepOutput};
