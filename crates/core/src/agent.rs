mod builder;

use std::collections::HashSet;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use dialset_model::{ModelSettings, ModelTool};

use crate::context::RunContext;
use crate::hooks::AgentHooks;
use crate::model_client::ModelClient;
use crate::tool::ToolObject;
pub use builder::AgentBuilder;

type InstructionsFn = dyn Fn(&RunContext, &Agent) -> String + Send + Sync;

/// The system instructions of an agent.
#[derive(Clone)]
pub enum Instructions {
    /// A fixed text.
    Static(String),
    /// Computed from the run context each time a run starts.
    Dynamic(Arc<InstructionsFn>),
}

impl Debug for Instructions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Instructions::Static(text) => {
                f.debug_tuple("Static").field(text).finish()
            }
            Instructions::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// An agent definition: a name, instructions, a model with its settings,
/// and a set of tools.
///
/// The definition is immutable once built. Cloning is cheap and clones
/// share tool objects; use [`Agent::to_builder`] to derive a variant
/// without touching the original.
#[derive(Clone)]
pub struct Agent {
    pub(crate) name: String,
    pub(crate) instructions: Option<Instructions>,
    pub(crate) model_client: ModelClient,
    pub(crate) model_settings: ModelSettings,
    pub(crate) tools: Vec<Arc<dyn ToolObject>>,
    pub(crate) reset_tool_choice: bool,
    pub(crate) hooks: Option<Arc<dyn AgentHooks>>,
}

impl Agent {
    /// Returns the name of the agent.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the instructions as configured, without evaluating them.
    #[inline]
    pub fn instructions(&self) -> Option<&Instructions> {
        self.instructions.as_ref()
    }

    /// Returns the agent-level model settings.
    #[inline]
    pub fn model_settings(&self) -> &ModelSettings {
        &self.model_settings
    }

    /// Returns whether a forced tool choice is cleared after tools ran.
    #[inline]
    pub fn reset_tool_choice(&self) -> bool {
        self.reset_tool_choice
    }

    /// Evaluates the instructions into the system prompt.
    pub fn system_prompt(&self, ctx: &RunContext) -> Option<String> {
        match self.instructions.as_ref()? {
            Instructions::Static(text) => Some(text.clone()),
            Instructions::Dynamic(f) => Some(f(ctx, self)),
        }
    }

    /// Returns the definitions of all tools, in registration order.
    ///
    /// Only the first tool registered under a name is listed, which is
    /// also the one executed when the model calls that name.
    pub fn tool_definitions(&self) -> Vec<ModelTool> {
        let mut seen = HashSet::with_capacity(self.tools.len());
        let mut definitions = Vec::with_capacity(self.tools.len());
        for tool in &self.tools {
            if seen.insert(tool.name()) {
                definitions.push(tool.definition());
            }
        }
        definitions
    }

    /// Creates a builder preloaded with this agent's definition.
    #[inline]
    pub fn to_builder(&self) -> AgentBuilder {
        AgentBuilder::from_agent(self.clone())
    }

    #[inline]
    pub(crate) fn model_client(&self) -> &ModelClient {
        &self.model_client
    }

    #[inline]
    pub(crate) fn tools(&self) -> &[Arc<dyn ToolObject>] {
        &self.tools
    }

    #[inline]
    pub(crate) fn hooks(&self) -> Option<&dyn AgentHooks> {
        self.hooks.as_deref()
    }
}

impl Debug for Agent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let tool_names: Vec<_> =
            self.tools.iter().map(|tool| tool.name()).collect();
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("instructions", &self.instructions)
            .field("model_settings", &self.model_settings)
            .field("tools", &tool_names)
            .field("reset_tool_choice", &self.reset_tool_choice)
            .field("has_hooks", &self.hooks.is_some())
            .finish_non_exhaustive()
    }
}
