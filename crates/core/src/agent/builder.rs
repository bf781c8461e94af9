use std::sync::Arc;

use dialset_model::{ModelProvider, ModelSettings};

use super::{Agent, Instructions};
use crate::context::RunContext;
use crate::hooks::AgentHooks;
use crate::model_client::ModelClient;
use crate::tool::{AnyTool, Tool, ToolObject};

/// [`Agent`] builder.
pub struct AgentBuilder {
    agent: Agent,
}

impl AgentBuilder {
    /// Creates a new builder with the agent name and its model provider.
    #[inline]
    pub fn with_model_provider<S, P>(name: S, provider: P) -> Self
    where
        S: Into<String>,
        P: ModelProvider + 'static,
    {
        Self::from_agent(Agent {
            name: name.into(),
            instructions: None,
            model_client: ModelClient::new(provider),
            model_settings: ModelSettings::default(),
            tools: vec![],
            reset_tool_choice: true,
            hooks: None,
        })
    }

    #[inline]
    pub(crate) fn from_agent(agent: Agent) -> Self {
        Self { agent }
    }

    /// Renames the agent.
    #[inline]
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.agent.name = name.into();
        self
    }

    /// Sets fixed instructions.
    #[inline]
    pub fn with_instructions<S: Into<String>>(mut self, text: S) -> Self {
        self.agent.instructions = Some(Instructions::Static(text.into()));
        self
    }

    /// Sets instructions computed at the start of every run.
    #[inline]
    pub fn with_dynamic_instructions(
        mut self,
        f: impl Fn(&RunContext, &Agent) -> String + Send + Sync + 'static,
    ) -> Self {
        self.agent.instructions = Some(Instructions::Dynamic(Arc::new(f)));
        self
    }

    /// Sets the agent-level model settings.
    ///
    /// Fields left unset here may still be provided per run, see
    /// [`crate::RunConfig::with_model_settings`].
    #[inline]
    pub fn with_model_settings(mut self, settings: ModelSettings) -> Self {
        self.agent.model_settings = settings;
        self
    }

    /// Registers a tool.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        let tool: Arc<dyn ToolObject> = Arc::new(AnyTool(tool));
        self.agent.tools.push(tool);
        self
    }

    /// Removes all registered tools.
    #[inline]
    pub fn without_tools(mut self) -> Self {
        self.agent.tools.clear();
        self
    }

    /// Controls whether a forced `tool_choice` (`required` or a named
    /// tool) is cleared once tools have run, so the model can give a
    /// final answer. Defaults to `true`.
    #[inline]
    pub fn with_reset_tool_choice(mut self, reset: bool) -> Self {
        self.agent.reset_tool_choice = reset;
        self
    }

    /// Attaches hooks fired for runs driven by this agent.
    #[inline]
    pub fn with_hooks<H: AgentHooks + 'static>(mut self, hooks: H) -> Self {
        self.agent.hooks = Some(Arc::new(hooks));
        self
    }

    /// Builds the agent.
    #[inline]
    pub fn build(self) -> Agent {
        self.agent
    }
}
