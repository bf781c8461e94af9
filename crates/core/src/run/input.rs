use dialset_model::ModelMessage;

use crate::agent::Agent;
use crate::context::RunContext;

pub(crate) type ModelInputFilter =
    dyn Fn(&RunContext, &Agent, ModelInputData) -> ModelInputData + Send + Sync;

/// What the model is about to receive on one call.
///
/// A filter set with [`crate::RunConfig::with_model_input_filter`] gets
/// this right before every model request and returns the data actually
/// sent. Changes apply to that request only, the run history is kept
/// as it was.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelInputData {
    /// The system prompt, if any.
    pub instructions: Option<String>,
    /// The conversation so far, without the system prompt.
    pub input: Vec<ModelMessage>,
}

impl ModelInputData {
    pub(crate) fn into_messages(self) -> Vec<ModelMessage> {
        let mut messages = Vec::with_capacity(self.input.len() + 1);
        if let Some(instructions) = self.instructions {
            messages.push(ModelMessage::System(instructions));
        }
        messages.extend(self.input);
        messages
    }
}
