use dialset_model::{ModelSettings, ToolCallRequest};
use serde::de::DeserializeOwned;

use super::RunError;

/// Something that happened during a run, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum RunItem {
    /// The input that started the run.
    UserInput(String),
    /// Text produced by the model.
    MessageOutput(String),
    /// A tool call requested by the model.
    ToolCall(ToolCallRequest),
    /// The text a tool call produced, as reported to the model.
    ToolOutput {
        /// The id of the originating request.
        id: String,
        /// The name of the tool.
        name: String,
        /// The output text.
        output: String,
    },
}

/// The outcome of a successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunResult {
    /// The text of the last model message, which had no tool calls.
    pub final_output: String,
    /// Everything that happened, in order.
    pub items: Vec<RunItem>,
    /// The settings resolved from the agent and the run configuration.
    pub settings: ModelSettings,
    /// The name of the agent that produced the final output.
    pub last_agent: String,
}

impl RunResult {
    /// Parses the final output as JSON into `T`.
    ///
    /// A surrounding markdown code fence (` ```json ... ``` `) is
    /// ignored.
    pub fn final_output_as<T: DeserializeOwned>(&self) -> Result<T, RunError> {
        serde_json::from_str(strip_code_fence(&self.final_output))
            .map_err(|err| RunError::InvalidOutput(err.to_string()))
    }
}

fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return text;
    };
    // Drop the language tag on the opening line.
    match body.split_once('\n') {
        Some((_, code)) => code.trim(),
        None => body.trim(),
    }
}
