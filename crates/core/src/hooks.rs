//! Callbacks for observing a run.

use async_trait::async_trait;
use dialset_model::{AssistantMessage, ModelRequest, ToolCallRequest};

use crate::{Agent, RunContext};

/// Receives lifecycle events of a run.
///
/// All methods do nothing by default, implement the ones you care
/// about. Hooks are awaited on the run's task, so a slow hook delays the
/// run.
#[async_trait]
pub trait RunHooks: Send + Sync {
    /// Called once before the agent handles the input.
    async fn on_agent_start(&self, _ctx: &RunContext, _agent: &Agent) {}

    /// Called once the agent produced its final output.
    async fn on_agent_end(
        &self,
        _ctx: &RunContext,
        _agent: &Agent,
        _output: &str,
    ) {
    }

    /// Called before each model request, with the effective settings
    /// available in `request.settings`.
    async fn on_llm_start(
        &self,
        _ctx: &RunContext,
        _agent: &Agent,
        _system_prompt: Option<&str>,
        _request: &ModelRequest,
    ) {
    }

    /// Called after each model response has been fully received.
    async fn on_llm_end(
        &self,
        _ctx: &RunContext,
        _agent: &Agent,
        _response: &AssistantMessage,
    ) {
    }

    /// Called before a tool is executed.
    async fn on_tool_start(
        &self,
        _ctx: &RunContext,
        _agent: &Agent,
        _call: &ToolCallRequest,
    ) {
    }

    /// Called after a tool finished, with the text reported to the model.
    async fn on_tool_end(
        &self,
        _ctx: &RunContext,
        _agent: &Agent,
        _call: &ToolCallRequest,
        _result: &str,
    ) {
    }
}

/// Receives lifecycle events of runs driven by one agent.
///
/// Attached with [`crate::AgentBuilder::with_hooks`]. Each event fires
/// right after the matching [`RunHooks`] method.
#[async_trait]
pub trait AgentHooks: Send + Sync {
    /// Called once before the agent handles the input.
    async fn on_start(&self, _ctx: &RunContext, _agent: &Agent) {}

    /// Called once the agent produced its final output.
    async fn on_end(
        &self,
        _ctx: &RunContext,
        _agent: &Agent,
        _output: &str,
    ) {
    }

    /// Called before each model request made for this agent.
    async fn on_llm_start(
        &self,
        _ctx: &RunContext,
        _agent: &Agent,
        _system_prompt: Option<&str>,
        _request: &ModelRequest,
    ) {
    }

    /// Called after each model response has been fully received.
    async fn on_llm_end(
        &self,
        _ctx: &RunContext,
        _agent: &Agent,
        _response: &AssistantMessage,
    ) {
    }

    /// Called before one of the agent's tools is executed.
    async fn on_tool_start(
        &self,
        _ctx: &RunContext,
        _agent: &Agent,
        _call: &ToolCallRequest,
    ) {
    }

    /// Called after a tool finished, with the text reported to the model.
    async fn on_tool_end(
        &self,
        _ctx: &RunContext,
        _agent: &Agent,
        _call: &ToolCallRequest,
        _result: &str,
    ) {
    }
}

pub(crate) struct NoopHooks;

impl RunHooks for NoopHooks {}
