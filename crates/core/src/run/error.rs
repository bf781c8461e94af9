use dialset_model::ErrorKind;
use thiserror::Error;

use crate::model_client::ProviderError;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The agent kept calling tools past the turn limit.
    #[error("max turns ({0}) exceeded")]
    MaxTurnsExceeded(usize),

    /// The model provider failed.
    #[error("model request failed ({kind}): {message}")]
    Model {
        /// The kind reported by the provider.
        kind: ErrorKind,
        /// The provider's error message.
        message: String,
    },

    /// The final output could not be parsed into the requested type.
    #[error("final output does not match the requested type: {0}")]
    InvalidOutput(String),

    /// The task driving a streamed run ended without a result.
    #[error("run task ended abnormally: {0}")]
    Aborted(String),
}

impl From<ProviderError> for RunError {
    fn from(err: ProviderError) -> Self {
        RunError::Model {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
