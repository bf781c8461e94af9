//! A local scripted model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, ready};
use std::time::Duration;

use dialset_model::{
    ErrorKind, ModelFinishReason, ModelProvider, ModelProviderError,
    ModelRequest, ModelResponse, ModelResponseEvent,
};
use tokio::time::{Sleep, sleep};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub struct TestModelResponse {
    preset: PresetResponse,
    delay: Duration,
    event_idx: usize,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl ModelResponse for TestModelResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        let this = self.get_mut();
        let events = &this.preset.events;

        if this.event_idx > events.len() {
            // In case this method is called after completion.
            return Poll::Ready(Ok(None));
        }

        let sleep = this
            .sleep
            .get_or_insert_with(|| Box::pin(sleep(this.delay)));
        ready!(sleep.as_mut().poll(cx));
        this.sleep = None;

        let event = match events.get(this.event_idx) {
            Some(PresetEvent::MessageDelta(msg)) => {
                ModelResponseEvent::MessageDelta(msg.clone())
            }
            Some(PresetEvent::ToolCall(req)) => {
                ModelResponseEvent::ToolCall(req.clone())
            }
            None => ModelResponseEvent::Completed(
                if this.preset.has_tool_call() {
                    ModelFinishReason::ToolCalls
                } else {
                    ModelFinishReason::Stop
                },
            ),
        };
        this.event_idx += 1;
        Poll::Ready(Ok(Some(event)))
    }
}

#[derive(Default)]
struct Script {
    responses: VecDeque<PresetResponse>,
    failed_attempts: u64,
    requests: Vec<ModelRequest>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, queue the responses the model should give.
/// Each request consumes the next queued response, in order. If the
/// queue is exhausted, an error will be returned.
///
/// Every request is recorded, including failed ones, so tests can check
/// what the runner actually sent (e.g. the resolved settings).
///
/// Clones share the same script and records.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    /// Queues a response for the next unanswered request.
    #[inline]
    pub fn add_response(&mut self, preset: PresetResponse) {
        self.lock().responses.push_back(preset);
    }

    /// Sets the delay between two response events.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns all requests received so far.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_response(&self, req: &ModelRequest) -> Result<PresetResponse, Error> {
        let mut script = self.lock();
        script.requests.push(req.clone());

        let exhausted = Error {
            message: "no enough steps",
            kind: ErrorKind::Other,
        };
        let Some(failures) = script.responses.front().map(|r| r.failures)
        else {
            return Err(exhausted);
        };
        match failures {
            Some(0) => {
                return Err(Error {
                    message: "preset failure",
                    kind: ErrorKind::RateLimitExceeded,
                });
            }
            Some(failures) if script.failed_attempts < failures => {
                script.failed_attempts += 1;
                return Err(Error {
                    message: "preset failure",
                    kind: ErrorKind::RateLimitExceeded,
                });
            }
            _ => {}
        }

        script.failed_attempts = 0;
        script.responses.pop_front().ok_or(exhausted)
    }
}

impl Debug for TestModelProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let script = self.lock();
        f.debug_struct("TestModelProvider")
            .field("pending_responses", &script.responses.len())
            .field("requests", &script.requests.len())
            .field("delay", &self.delay)
            .finish()
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;
    type Response = TestModelResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let resp = self.next_response(req).map(|preset| TestModelResponse {
            preset,
            delay: self.delay.unwrap_or(Duration::from_millis(1)),
            event_idx: 0,
            sleep: None,
        });
        ready(resp)
    }
}
