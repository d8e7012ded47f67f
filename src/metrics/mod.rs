//! Execution metrics and their aggregation.
//!
//! One [`ExecutionMetric`] is recorded per completed chain step. The
//! aggregation helpers are plain functions over a metric slice.

use crate::types::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timing and token record for one completed step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMetric {
    /// Agent name at the time the step ran
    pub agent_name: String,
    /// Wall-clock latency of the step in seconds
    pub latency: f64,
    /// Estimated tokens; zero for failed steps
    pub tokens: u64,
    /// Provider label, e.g. "Gemini"
    pub provider: String,
    pub timestamp: DateTime<Utc>,
}

/// Sum of step latencies in seconds
pub fn total_latency(metrics: &[ExecutionMetric]) -> f64 {
    metrics.iter().map(|m| m.latency).sum()
}

/// Sum of estimated tokens
pub fn total_tokens(metrics: &[ExecutionMetric]) -> u64 {
    metrics.iter().map(|m| m.tokens).sum()
}

/// Mean step latency in seconds.
///
/// # Errors
///
/// `AppError::DivisionByZero` when `metrics` is empty.
pub fn average_latency(metrics: &[ExecutionMetric]) -> Result<f64> {
    if metrics.is_empty() {
        return Err(AppError::DivisionByZero);
    }
    Ok(total_latency(metrics) / metrics.len() as f64)
}

/// Per-step `(agent name, latency)` pairs in step order
pub fn latency_by_agent(metrics: &[ExecutionMetric]) -> Vec<(&str, f64)> {
    metrics
        .iter()
        .map(|m| (m.agent_name.as_str(), m.latency))
        .collect()
}

/// Dashboard figures for a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub steps: usize,
    pub total_latency: f64,
    pub total_tokens: u64,
    pub average_latency: f64,
}

impl MetricsSummary {
    /// Summarize a metric list; `None` when there is nothing to summarize
    pub fn from_metrics(metrics: &[ExecutionMetric]) -> Option<Self> {
        let average_latency = average_latency(metrics).ok()?;
        Some(Self {
            steps: metrics.len(),
            total_latency: total_latency(metrics),
            total_tokens: total_tokens(metrics),
            average_latency,
        })
    }
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} steps, {:.2}s total, {} tokens, {:.2}s/step",
            self.steps, self.total_latency, self.total_tokens, self.average_latency
        )
    }
}
