//! Chain execution
//!
//! Agents run one after another over a growing context. The first agent sees
//! the seed text; every later agent sees the seed text plus each earlier
//! output under a `=== Output from <agent> ===` header.
//!
//! # Usage
//!
//! ```ignore
//! let executor = ChainExecutor::new(client, api_key);
//! let report = executor.execute(&document_text, store.agents()).await?;
//! for (agent, output) in report.agents.iter().zip(report.outputs()) {
//!     println!("{}: {}", agent.name, output);
//! }
//! ```

pub mod engine;

pub use engine::{
    append_to_context, context_separator, ChainExecutor, ChainReport, ChainRun, RunState,
    StateCallback, StepOutput,
};
