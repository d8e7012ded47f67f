//! Chain Executor
//!
//! Runs an ordered list of agents over a seed text. Each step sees the seed
//! text plus every earlier step's output, labelled with the agent that
//! produced it. Steps run strictly one after another; a failed step records
//! its error text and a zero-token metric and the chain moves on.
//!
//! Progress is published as [`RunState`] snapshots:
//!
//! 1. one snapshot when a step starts (`current_step = Some(i)`)
//! 2. one snapshot when it completes (output and metric recorded)
//! 3. a final snapshot with `running = false` and `current_step = None`

use crate::agents::AgentSpec;
use crate::llm::generation::{render_failure, GenerationOutcome, GenerationRequest, Generator};
use crate::metrics::{ExecutionMetric, MetricsSummary};
use crate::types::{AppError, Result};
use async_stream::stream;
use chrono::Utc;
use futures::stream::{BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// Output slot of one chain step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutput {
    /// Not produced yet
    Pending,
    Completed { text: String },
    /// The provider call failed; the chain continued without it
    Failed { reason: String },
}

impl StepOutput {
    /// Text shown for this step: empty while pending, error text on failure
    pub fn render(&self) -> String {
        match self {
            StepOutput::Pending => String::new(),
            StepOutput::Completed { text } => text.clone(),
            StepOutput::Failed { reason } => render_failure(reason),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, StepOutput::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutput::Failed { .. })
    }
}

impl From<GenerationOutcome> for StepOutput {
    fn from(outcome: GenerationOutcome) -> Self {
        match outcome {
            GenerationOutcome::Success { text, .. } => StepOutput::Completed { text },
            GenerationOutcome::Failure { reason } => StepOutput::Failed { reason },
        }
    }
}

/// Snapshot of a chain run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub run_id: Uuid,
    /// Index of the step in flight; `None` once the run is over
    pub current_step: Option<usize>,
    /// One slot per agent, in agent order
    pub steps: Vec<StepOutput>,
    /// One metric per completed step, in step order
    pub metrics: Vec<ExecutionMetric>,
    /// Seed text followed by every completed step's labelled output
    pub context: String,
    pub running: bool,
    pub cancelled: bool,
}

impl RunState {
    fn start(run_id: Uuid, input_text: &str, step_count: usize) -> Self {
        Self {
            run_id,
            current_step: None,
            steps: vec![StepOutput::Pending; step_count],
            metrics: Vec::new(),
            context: input_text.to_string(),
            running: true,
            cancelled: false,
        }
    }

    /// Rendered per-step outputs; pending steps are empty strings
    pub fn outputs(&self) -> Vec<String> {
        self.steps.iter().map(StepOutput::render).collect()
    }

    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| !s.is_pending()).count()
    }

    pub fn failed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.is_failed()).count()
    }
}

/// Header placed before each step's output in the chain context
pub fn context_separator(agent_name: &str) -> String {
    format!("\n\n=== Output from {} ===\n", agent_name)
}

/// Append a step's output to the chain context
pub fn append_to_context(context: &mut String, agent_name: &str, output: &str) {
    context.push_str(&context_separator(agent_name));
    context.push_str(output);
}

/// Lazy sequence of run snapshots; the last item is the terminal state
pub type ChainRun = BoxStream<'static, RunState>;

/// Callback invoked with every snapshot of a run
pub type StateCallback = Box<dyn FnMut(&RunState) + Send>;

/// Terminal result of a chain run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainReport {
    /// Final snapshot (`running == false`)
    pub state: RunState,
    /// The agent list the run used
    pub agents: Vec<AgentSpec>,
}

impl ChainReport {
    pub fn outputs(&self) -> Vec<String> {
        self.state.outputs()
    }

    pub fn metrics(&self) -> &[ExecutionMetric] {
        &self.state.metrics
    }

    pub fn context(&self) -> &str {
        &self.state.context
    }

    pub fn cancelled(&self) -> bool {
        self.state.cancelled
    }

    pub fn summary(&self) -> Option<MetricsSummary> {
        MetricsSummary::from_metrics(&self.state.metrics)
    }
}

/// Clears the executor's running flag when the run ends or is dropped
struct RunGuard(Arc<AtomicBool>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Sequential agent-chaining executor
///
/// One executor runs at most one chain at a time; clones share that limit.
#[derive(Clone)]
pub struct ChainExecutor {
    client: Arc<dyn Generator>,
    api_key: String,
    running: Arc<AtomicBool>,
}

impl ChainExecutor {
    /// Create an executor that authenticates every step with `api_key`
    pub fn new<G: Generator + 'static>(client: G, api_key: impl Into<String>) -> Self {
        Self::with_generator(Arc::new(client), api_key)
    }

    /// Create an executor over a shared generator
    pub fn with_generator(client: Arc<dyn Generator>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a run started by this executor (or a clone) is still active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start a chain run.
    ///
    /// All preconditions are checked here, before any provider call: the
    /// input text must be non-blank, the API key present and every agent
    /// valid. The returned stream is lazy; nothing is sent to the provider
    /// until it is polled.
    ///
    /// Without a cancellation token the run always goes to completion.
    ///
    /// # Errors
    ///
    /// - `AppError::Validation` for blank input or an invalid agent
    /// - `AppError::Configuration` for a missing API key
    /// - `AppError::ConcurrentRun` while another run is active
    pub fn run(
        &self,
        input_text: &str,
        agents: &[AgentSpec],
        cancel: Option<CancellationToken>,
    ) -> Result<ChainRun> {
        if input_text.trim().is_empty() {
            return Err(AppError::Validation(
                "Input text is empty; process a document first".to_string(),
            ));
        }
        if self.api_key.trim().is_empty() {
            return Err(AppError::Configuration(
                "API key is required to run the chain".to_string(),
            ));
        }
        for agent in agents {
            agent.validate()?;
        }

        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::ConcurrentRun);
        }
        let guard = RunGuard(Arc::clone(&self.running));

        let run_id = Uuid::new_v4();
        let agents = agents.to_vec();
        let input_text = input_text.to_string();
        let client = Arc::clone(&self.client);
        let api_key = self.api_key.clone();
        let provider = client.provider_name().to_string();
        let cancel = cancel.unwrap_or_default();

        info!(%run_id, steps = agents.len(), "Starting chain run");

        let run = stream! {
            let _guard = guard;
            let mut state = RunState::start(run_id, &input_text, agents.len());

            for (index, agent) in agents.iter().enumerate() {
                if cancel.is_cancelled() {
                    state.cancelled = true;
                    break;
                }

                state.current_step = Some(index);
                yield state.clone();

                info!(%run_id, step = index, agent = %agent.name, model = %agent.model, "Running agent");
                let started = Instant::now();

                let request = GenerationRequest {
                    api_key: &api_key,
                    model: &agent.model,
                    system_prompt: &agent.system_prompt,
                    user_prompt: &agent.user_prompt,
                    context: &state.context,
                    temperature: agent.temperature,
                    max_tokens: agent.max_tokens,
                };

                let outcome = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    result = client.generate(&request) => Some(result),
                };

                let outcome = match outcome {
                    Some(Ok(outcome)) => outcome,
                    Some(Err(e)) => GenerationOutcome::Failure { reason: e.to_string() },
                    None => {
                        warn!(%run_id, step = index, "Chain run cancelled mid-step");
                        state.cancelled = true;
                        break;
                    }
                };

                let latency = started.elapsed().as_secs_f64();
                let tokens = outcome.tokens();
                if let GenerationOutcome::Failure { reason } = &outcome {
                    warn!(%run_id, step = index, agent = %agent.name, "Agent step failed: {}", reason);
                } else {
                    info!(%run_id, step = index, agent = %agent.name, latency, tokens, "Agent step completed");
                }

                let step = StepOutput::from(outcome);
                append_to_context(&mut state.context, &agent.name, &step.render());
                state.steps[index] = step;
                state.metrics.push(ExecutionMetric {
                    agent_name: agent.name.clone(),
                    latency,
                    tokens,
                    provider: provider.clone(),
                    timestamp: Utc::now(),
                });

                yield state.clone();
            }

            state.running = false;
            state.current_step = None;
            info!(
                %run_id,
                completed = state.completed_steps(),
                failed = state.failed_steps(),
                cancelled = state.cancelled,
                "Chain run finished"
            );
            yield state;
        };

        Ok(run.boxed())
    }

    /// Run the chain to completion and return the final report
    pub async fn execute(&self, input_text: &str, agents: &[AgentSpec]) -> Result<ChainReport> {
        self.execute_with_callbacks(input_text, agents, None, None)
            .await
    }

    /// Run the chain to completion, reporting every snapshot to `on_update`
    pub async fn execute_with_callbacks(
        &self,
        input_text: &str,
        agents: &[AgentSpec],
        cancel: Option<CancellationToken>,
        mut on_update: Option<StateCallback>,
    ) -> Result<ChainReport> {
        let mut run = self.run(input_text, agents, cancel)?;

        let mut last = None;
        while let Some(state) = run.next().await {
            if let Some(callback) = on_update.as_mut() {
                callback(&state);
            }
            last = Some(state);
        }

        let state =
            last.ok_or_else(|| AppError::Internal("Chain run produced no state".to_string()))?;

        Ok(ChainReport {
            state,
            agents: agents.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::{LLMClient, ProviderRequest};
    use crate::llm::generation::GenerationClient;
    use async_trait::async_trait;

    struct EchoClient;

    #[async_trait]
    impl LLMClient for EchoClient {
        async fn complete(&self, request: &ProviderRequest) -> Result<Option<String>> {
            Ok(Some(format!("echo:{}", request.model)))
        }

        fn provider_name(&self) -> &str {
            "Gemini"
        }
    }

    fn executor(api_key: &str) -> ChainExecutor {
        ChainExecutor::new(GenerationClient::new(Arc::new(EchoClient)), api_key)
    }

    #[test]
    fn test_step_output_render() {
        assert_eq!(StepOutput::Pending.render(), "");
        assert_eq!(
            StepOutput::Completed { text: "ok".to_string() }.render(),
            "ok"
        );
        assert_eq!(
            StepOutput::Failed { reason: "boom".to_string() }.render(),
            "Error generating content: boom"
        );
    }

    #[test]
    fn test_append_to_context() {
        let mut context = "seed".to_string();
        append_to_context(&mut context, "Agent A", "out");
        assert_eq!(context, "seed\n\n=== Output from Agent A ===\nout");
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let agents = vec![AgentSpec::new("a", "A", "S", "U")];
        assert!(matches!(
            executor("key").run("   ", &agents, None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let agents = vec![AgentSpec::new("a", "A", "S", "U")];
        assert!(matches!(
            executor("").run("text", &agents, None),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_invalid_agent_is_rejected_before_run() {
        let agents = vec![AgentSpec::new("a", "A", "S", "U").with_max_tokens(0)];
        let executor = executor("key");
        assert!(executor.run("text", &agents, None).is_err());
        assert!(!executor.is_running());
    }

    #[tokio::test]
    async fn test_snapshot_sequence() {
        let agents = vec![
            AgentSpec::new("a", "A", "S1", "U1"),
            AgentSpec::new("b", "B", "S2", "U2"),
        ];
        let states: Vec<RunState> = executor("key")
            .run("text", &agents, None)
            .unwrap()
            .collect()
            .await;

        // start + done per step, plus the final snapshot
        assert_eq!(states.len(), 5);
        assert_eq!(states[0].current_step, Some(0));
        assert!(states[0].metrics.is_empty());
        assert_eq!(states[1].metrics.len(), 1);
        assert_eq!(states[2].current_step, Some(1));
        assert_eq!(states[3].metrics.len(), 2);

        let last = states.last().unwrap();
        assert!(!last.running);
        assert_eq!(last.current_step, None);
        for state in &states {
            assert_eq!(state.steps.len(), agents.len());
        }
    }

    #[tokio::test]
    async fn test_guard_released_when_run_dropped() {
        let executor = executor("key");
        let agents = vec![AgentSpec::new("a", "A", "S", "U")];

        let run = executor.run("text", &agents, None).unwrap();
        assert!(executor.is_running());
        assert!(matches!(
            executor.run("text", &agents, None),
            Err(AppError::ConcurrentRun)
        ));

        drop(run);
        assert!(!executor.is_running());
        assert!(executor.run("text", &agents, None).is_ok());
    }
}
