mod config;
mod error;
mod input;
mod result;
mod stream;

use dialset_model::{ModelMessage, ModelRequest, ToolCallResult};
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::agent::Agent;
use crate::hooks::{NoopHooks, RunHooks};
use crate::tool::{self, Executor};
pub use config::{DEFAULT_MAX_RETRIES, DEFAULT_MAX_TURNS, RunConfig};
pub use error::RunError;
pub use input::ModelInputData;
pub use result::{RunItem, RunResult};
pub use stream::{RunStream, StreamEvent};

type EventSender = mpsc::UnboundedSender<StreamEvent>;

/// Drives an agent until it produces a final output.
///
/// A run alternates between model requests and tool executions. Every
/// request carries the agent's settings resolved against the run's
/// settings (see [`dialset_model::ModelSettings::resolve`]).
pub struct Runner;

impl Runner {
    /// Runs `agent` on `input` and waits for the final output.
    pub async fn run<S: Into<String>>(
        agent: &Agent,
        input: S,
        config: &RunConfig,
    ) -> Result<RunResult, RunError> {
        run_loop(agent, input.into(), config, None).await
    }

    /// Runs `agent` on `input` in a background task, streaming events.
    ///
    /// Must be called within a tokio runtime.
    pub fn run_streamed<S: Into<String>>(
        agent: &Agent,
        input: S,
        config: &RunConfig,
    ) -> RunStream {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let agent = agent.clone();
        let config = config.clone();
        let input = input.into();
        let task = tokio::spawn(async move {
            run_loop(&agent, input, &config, Some(event_tx)).await
        });
        RunStream {
            events: event_rx,
            task,
        }
    }
}

async fn run_loop(
    agent: &Agent,
    input: String,
    config: &RunConfig,
    events: Option<EventSender>,
) -> Result<RunResult, RunError> {
    let span = debug_span!("run", agent = agent.name());
    async move {
        let settings = agent.model_settings().resolve(config.model_settings());
        debug!("resolved model settings: {settings:?}");

        let ctx = config.context();
        let hooks: &dyn RunHooks = config.hooks.as_deref().unwrap_or(&NoopHooks);
        let model_client = config
            .model_client
            .as_ref()
            .unwrap_or_else(|| agent.model_client());
        let executor = Executor::with_tools(agent.tools());
        let tools = agent.tool_definitions();
        let system_prompt = agent.system_prompt(ctx);

        let mut history = vec![ModelMessage::User(input.clone())];
        let mut items = vec![RunItem::UserInput(input)];
        let mut turn_settings = settings.clone();
        let agent_hooks = agent.hooks();

        hooks.on_agent_start(ctx, agent).await;
        if let Some(agent_hooks) = agent_hooks {
            agent_hooks.on_start(ctx, agent).await;
        }

        for turn in 1..=config.max_turns() {
            trace!("turn {turn} started");
            let mut model_input = ModelInputData {
                instructions: system_prompt.clone(),
                input: history.clone(),
            };
            if let Some(filter) = &config.model_input_filter {
                model_input = filter(ctx, agent, model_input);
                trace!("model input after filter: {model_input:?}");
            }
            let instructions = model_input.instructions.clone();
            let request = ModelRequest {
                messages: model_input.into_messages(),
                tools: tools.clone(),
                settings: turn_settings.clone(),
            };
            hooks
                .on_llm_start(ctx, agent, instructions.as_deref(), &request)
                .await;
            if let Some(agent_hooks) = agent_hooks {
                agent_hooks
                    .on_llm_start(ctx, agent, instructions.as_deref(), &request)
                    .await;
            }

            let on_delta = {
                let events = events.clone();
                move |delta| {
                    if let Some(events) = &events {
                        events.send(StreamEvent::TextDelta(delta)).ok();
                    }
                }
            };
            let resp = model_client
                .send_request(request, config.max_retries, on_delta)
                .await?;
            let message = resp.into_message();
            hooks.on_llm_end(ctx, agent, &message).await;
            if let Some(agent_hooks) = agent_hooks {
                agent_hooks.on_llm_end(ctx, agent, &message).await;
            }
            history.push(ModelMessage::Assistant(message.clone()));

            if !message.content.is_empty() {
                items.push(RunItem::MessageOutput(message.content.clone()));
            }
            if message.tool_calls.is_empty() {
                hooks.on_agent_end(ctx, agent, &message.content).await;
                if let Some(agent_hooks) = agent_hooks {
                    agent_hooks.on_end(ctx, agent, &message.content).await;
                }
                return Ok(RunResult {
                    final_output: message.content,
                    items,
                    settings,
                    last_agent: agent.name().to_owned(),
                });
            }

            let calls = message.tool_calls;
            for call in &calls {
                items.push(RunItem::ToolCall(call.clone()));
                send_event(&events, StreamEvent::ToolCalled(call.clone()));
                hooks.on_tool_start(ctx, agent, call).await;
                if let Some(agent_hooks) = agent_hooks {
                    agent_hooks.on_tool_start(ctx, agent, call).await;
                }
            }

            let parallel = turn_settings.parallel_tool_calls != Some(false);
            let results = executor.execute_all(&calls, parallel).await;
            for (call, result) in calls.iter().zip(results) {
                let output = tool::output_text(&result);
                if let Err(err) = &result {
                    debug!("tool {} ({}) failed: {err}", call.name, call.id);
                }
                hooks.on_tool_end(ctx, agent, call, &output).await;
                if let Some(agent_hooks) = agent_hooks {
                    agent_hooks.on_tool_end(ctx, agent, call, &output).await;
                }
                send_event(
                    &events,
                    StreamEvent::ToolOutput {
                        id: call.id.clone(),
                        output: output.clone(),
                    },
                );
                items.push(RunItem::ToolOutput {
                    id: call.id.clone(),
                    name: call.name.clone(),
                    output: output.clone(),
                });
                history.push(ModelMessage::Tool(ToolCallResult {
                    id: call.id.clone(),
                    content: output,
                }));
            }

            // A forced tool choice would make the model call tools forever.
            let forced = turn_settings
                .tool_choice
                .as_ref()
                .is_some_and(|choice| choice.is_forced());
            if forced && agent.reset_tool_choice() {
                debug!("clearing forced tool choice after tool use");
                turn_settings.tool_choice = None;
            }
        }

        warn!("max turns ({}) exceeded", config.max_turns());
        Err(RunError::MaxTurnsExceeded(config.max_turns()))
    }
    .instrument(span)
    .await
}

#[inline]
fn send_event(events: &Option<EventSender>, event: StreamEvent) {
    if let Some(events) = events {
        events.send(event).ok();
    }
}
