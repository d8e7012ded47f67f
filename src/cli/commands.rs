//! Subcommand handlers

use super::output::Output;
use crate::agents::AgentStore;
use crate::llm::GenerationClient;
use crate::report::ReviewNotes;
use crate::types::{AppError, Result};
use crate::utils::config::ChainConfig;
use crate::workflows::{ChainExecutor, ChainReport, RunState, StateCallback};
use std::io::Read;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Arguments of the `run` subcommand
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub notes: Option<PathBuf>,
    pub api_key: Option<String>,
}

/// Read the seed text from a file, or from stdin for `None` and `-`
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Progress printer for a run: one line when a step starts and one when it
/// finishes
pub fn progress_callback(output: Output, names: Vec<String>) -> StateCallback {
    let total = names.len();
    Box::new(move |state: &RunState| {
        let Some(index) = state.current_step else {
            return;
        };
        let name = names.get(index).map(String::as_str).unwrap_or("?");
        match state.steps.get(index) {
            Some(step) if step.is_pending() => {
                output.step(index + 1, total, &format!("Running {}", name));
            }
            Some(step) if step.is_failed() => {
                output.warning(&format!("{} failed: {}", name, step.render()));
            }
            Some(_) => {
                let detail = state
                    .metrics
                    .get(index)
                    .map(|m| format!(" ({:.2}s, ~{} tokens)", m.latency, m.tokens))
                    .unwrap_or_default();
                output.success(&format!("{} done{}", name, detail));
            }
            None => {}
        }
    })
}

/// Run the chain over the input and write the Markdown report.
///
/// Ctrl-C cancels the run; the steps that finished are still reported.
pub async fn run(config: &ChainConfig, args: RunArgs, output: Output) -> Result<ChainReport> {
    let api_key = match args.api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => key,
        None => config.api_key()?,
    };

    let input_text = read_input(args.input.as_deref())?;
    let store = config.agent_store()?;
    let agents = store.snapshot();

    let provider = config.provider.provider();
    let client = GenerationClient::new(provider.create_client()?)
        .with_timeout(config.request_timeout());
    let executor = ChainExecutor::new(client, api_key);

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    output.info(&format!(
        "Running {} agents with {} ({} characters of input)",
        agents.len(),
        provider.name(),
        input_text.chars().count()
    ));

    let names = agents.iter().map(|a| a.name.clone()).collect();
    let result = executor
        .execute_with_callbacks(
            &input_text,
            &agents,
            Some(cancel),
            Some(progress_callback(output, names)),
        )
        .await;
    interrupt.abort();
    let report = result?;

    if report.cancelled() {
        output.warning("Run cancelled; remaining agents were not run");
    }
    match report.summary() {
        Some(summary) => output.info(&summary.to_string()),
        None => output.info("No metrics recorded"),
    }

    let markdown = report.to_markdown();
    match &args.output {
        Some(path) => {
            std::fs::write(path, &markdown)?;
            output.success(&format!("Report written to {}", path.display()));
        }
        None => println!("{}", markdown),
    }

    if let Some(path) = &args.notes {
        append_notes(path, &report)?;
        output.success(&format!("Notes updated in {}", path.display()));
    }

    Ok(report)
}

/// Append the report's agent outputs to the notes file at `path`, starting a
/// fresh document when the file does not exist yet
pub fn append_notes(path: &Path, report: &ChainReport) -> Result<ReviewNotes> {
    let mut notes = match std::fs::read_to_string(path) {
        Ok(existing) => ReviewNotes::from_content(existing),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => ReviewNotes::new(),
        Err(e) => return Err(e.into()),
    };
    notes.add_report(report);

    let mut content = notes.content().to_string();
    content.push('\n');
    std::fs::write(path, content)?;
    tracing::debug!(path = %path.display(), "Notes written");
    Ok(notes)
}

/// List agents in execution order
pub fn agents_list(store: &AgentStore, output: Output) {
    output.header("Agents");
    output.table_header(&["Id", "Model", "Temperature", "Max tokens", "Name"]);
    for agent in store.agents() {
        let temperature = format!("{:.1}", agent.temperature);
        let max_tokens = agent.max_tokens.to_string();
        output.table_row(&[
            agent.id.as_str(),
            agent.model.as_str(),
            temperature.as_str(),
            max_tokens.as_str(),
            agent.name.as_str(),
        ]);
    }
}

/// Show one agent in full
pub fn agents_show(store: &AgentStore, id: &str, output: Output) -> Result<()> {
    let agent = store
        .get(id)
        .ok_or_else(|| AppError::Validation(format!("Agent '{}' not found", id)))?;

    output.header(&agent.name);
    output.kv("Id", &agent.id);
    output.kv("Model", &agent.model);
    output.kv("Temperature", &agent.temperature.to_string());
    output.kv("Max tokens", &agent.max_tokens.to_string());
    if !agent.description.is_empty() {
        output.kv("Description", &agent.description);
    }
    output.subheader("System instruction");
    output.block(&agent.system_prompt);
    output.subheader("User instruction");
    output.block(&agent.user_prompt);
    Ok(())
}

/// Show (and optionally validate) the configuration
pub fn config(path: &Path, full: bool, validate: bool, output: Output) -> Result<()> {
    let config = if validate {
        let config = ChainConfig::load(path)?;
        output.success(&format!("{} is valid", path.display()));
        config
    } else {
        ChainConfig::load_or_default(path)?
    };

    output.header("Configuration");
    output.kv("File", &path.display().to_string());
    output.kv("Provider", config.provider.provider().name());
    output.kv("API key variable", config.provider.api_key_env());
    output.kv(
        "API key",
        if config.api_key().is_ok() { "set" } else { "not set" },
    );
    output.kv(
        "Request timeout",
        &config
            .request_timeout()
            .map(|t| format!("{}s", t.as_secs()))
            .unwrap_or_else(|| "disabled".to_string()),
    );
    output.kv(
        "Agents",
        &if config.agents.is_empty() {
            "built-in review pipeline".to_string()
        } else {
            format!("{} configured", config.agents.len())
        },
    );

    if full {
        let rendered = toml::to_string_pretty(&config)
            .map_err(|e| AppError::Internal(format!("Failed to render configuration: {}", e)))?;
        output.subheader("Full configuration");
        output.block(&rendered);
    }

    if config.api_key().is_err() {
        output.hint(&format!(
            "Set {} (or pass --api-key) before running the chain",
            config.provider.api_key_env()
        ));
    }
    Ok(())
}
