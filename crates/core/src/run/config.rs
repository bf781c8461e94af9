use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use dialset_model::{ModelProvider, ModelSettings};

use super::input::{ModelInputData, ModelInputFilter};
use crate::agent::Agent;
use crate::context::RunContext;
use crate::hooks::RunHooks;
use crate::model_client::ModelClient;

/// The default number of model requests a run may make.
pub const DEFAULT_MAX_TURNS: usize = 10;
/// The default number of retries for a rate-limited model request.
pub const DEFAULT_MAX_RETRIES: u64 = 3;

/// Per-execution configuration, shared by everything a run does.
#[derive(Clone)]
pub struct RunConfig {
    pub(crate) model_settings: ModelSettings,
    pub(crate) model_client: Option<ModelClient>,
    pub(crate) max_turns: usize,
    pub(crate) max_retries: u64,
    pub(crate) context: RunContext,
    pub(crate) hooks: Option<Arc<dyn RunHooks>>,
    pub(crate) model_input_filter: Option<Arc<ModelInputFilter>>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model_settings: ModelSettings::default(),
            model_client: None,
            max_turns: DEFAULT_MAX_TURNS,
            max_retries: DEFAULT_MAX_RETRIES,
            context: RunContext::default(),
            hooks: None,
            model_input_filter: None,
        }
    }
}

impl RunConfig {
    /// Sets run-level model settings.
    ///
    /// Every field set here overrides the agent's own value for this
    /// run; unset fields fall back to the agent's settings.
    #[inline]
    pub fn with_model_settings(mut self, settings: ModelSettings) -> Self {
        self.model_settings = settings;
        self
    }

    /// Uses `provider` instead of the agent's own model for this run.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        mut self,
        provider: P,
    ) -> Self {
        self.model_client = Some(ModelClient::new(provider));
        self
    }

    /// Sets the maximum number of model requests.
    #[inline]
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Sets how many times a rate-limited model request is retried.
    #[inline]
    pub fn with_max_retries(mut self, max_retries: u64) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Attaches user data, see [`RunContext`].
    #[inline]
    pub fn with_context<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.context = RunContext::new(value);
        self
    }

    /// Attaches lifecycle hooks.
    #[inline]
    pub fn with_hooks<H: RunHooks + 'static>(mut self, hooks: H) -> Self {
        self.hooks = Some(Arc::new(hooks));
        self
    }

    /// Rewrites the instructions and input right before each model call.
    ///
    /// The filter sees the run context and the agent, and returns what
    /// is actually sent. The run history itself is not modified.
    #[inline]
    pub fn with_model_input_filter(
        mut self,
        f: impl Fn(&RunContext, &Agent, ModelInputData) -> ModelInputData
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.model_input_filter = Some(Arc::new(f));
        self
    }

    /// Returns the run-level model settings.
    #[inline]
    pub fn model_settings(&self) -> &ModelSettings {
        &self.model_settings
    }

    /// Returns the maximum number of model requests.
    #[inline]
    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Returns the run context.
    #[inline]
    pub fn context(&self) -> &RunContext {
        &self.context
    }
}

impl Debug for RunConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("model_settings", &self.model_settings)
            .field("overrides_model", &self.model_client.is_some())
            .field("max_turns", &self.max_turns)
            .field("max_retries", &self.max_retries)
            .field("context", &self.context)
            .field("has_hooks", &self.hooks.is_some())
            .field("has_model_input_filter", &self.model_input_filter.is_some())
            .finish()
    }
}
