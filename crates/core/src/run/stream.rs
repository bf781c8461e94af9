use dialset_model::ToolCallRequest;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{RunError, RunResult};

/// An event emitted while a streamed run progresses.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamEvent {
    /// A piece of text from the model.
    TextDelta(String),
    /// The model asked to call a tool.
    ToolCalled(ToolCallRequest),
    /// A tool produced its output.
    ToolOutput {
        /// The id of the originating request.
        id: String,
        /// The output text.
        output: String,
    },
}

/// A run executing in the background.
///
/// Pull events with [`RunStream::next_event`], then get the result with
/// [`RunStream::finish`]. Dropping the stream does not cancel the run.
pub struct RunStream {
    pub(crate) events: mpsc::UnboundedReceiver<StreamEvent>,
    pub(crate) task: JoinHandle<Result<RunResult, RunError>>,
}

impl RunStream {
    /// Waits for the next event. Returns `None` once the run ended.
    #[inline]
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.events.recv().await
    }

    /// Waits for the run to end and returns its result.
    ///
    /// Events not yet pulled are discarded.
    pub async fn finish(self) -> Result<RunResult, RunError> {
        self.task
            .await
            .map_err(|err| RunError::Aborted(err.to_string()))?
    }
}
