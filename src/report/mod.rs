//! Markdown rendering of completed runs, and reviewer notes.

use crate::metrics::{latency_by_agent, MetricsSummary};
use crate::workflows::ChainReport;

/// Initial content of a fresh notes document
pub const NOTES_HEADER: &str = "## Review Notes\n\nStart by adding agent outputs here.";

impl ChainReport {
    /// Render the run as a Markdown review report
    pub fn to_markdown(&self) -> String {
        let mut lines = vec![
            "# Review Chain Report".to_string(),
            String::new(),
            format!("- Run: `{}`", self.state.run_id),
            format!(
                "- Steps: {} of {} completed, {} failed",
                self.state.completed_steps(),
                self.agents.len(),
                self.state.failed_steps()
            ),
        ];
        if self.cancelled() {
            lines.push("- Status: cancelled".to_string());
        }

        for (agent, step) in self.agents.iter().zip(&self.state.steps) {
            lines.push(String::new());
            lines.push(format!("## {}", agent.name));
            lines.push(String::new());
            if step.is_pending() {
                lines.push("_Not run._".to_string());
            } else {
                lines.push(step.render().trim_end().to_string());
            }
        }

        lines.extend([String::new(), "## Metrics".to_string(), String::new()]);
        match MetricsSummary::from_metrics(self.metrics()) {
            None => lines.push("No data".to_string()),
            Some(summary) => {
                lines.push("| Agent | Latency (s) | Tokens |".to_string());
                lines.push("|---|---:|---:|".to_string());
                for ((name, latency), metric) in
                    latency_by_agent(self.metrics()).into_iter().zip(self.metrics())
                {
                    lines.push(format!("| {} | {:.2} | {} |", name, latency, metric.tokens));
                }
                lines.push(String::new());
                lines.push(format!("Total: {}", summary));
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Free-form reviewer notes that agent outputs can be appended to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewNotes {
    content: String,
}

impl Default for ReviewNotes {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewNotes {
    pub fn new() -> Self {
        Self {
            content: NOTES_HEADER.to_string(),
        }
    }

    /// Continue an existing notes document
    pub fn from_content(content: impl Into<String>) -> Self {
        let content = content.into();
        if content.trim().is_empty() {
            return Self::new();
        }
        Self {
            content: content.trim_end().to_string(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Append a titled section
    pub fn add_section(&mut self, title: &str, text: &str) {
        self.content.push_str(&format!("\n\n### {}\n{}", title, text));
    }

    /// Append every rendered step output of a report under its agent's name
    pub fn add_report(&mut self, report: &ChainReport) {
        for (agent, step) in report.agents.iter().zip(&report.state.steps) {
            if !step.is_pending() {
                self.add_section(&agent.name, &step.render());
            }
        }
    }
}
