use std::future::poll_fn;
use std::pin::{Pin, pin};
use std::sync::Arc;
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use dialset_model::{
    AssistantMessage, ModelFinishReason, ModelProvider, ModelProviderError,
    ModelRequest, ModelResponse, ModelResponseEvent, ToolCallRequest,
};
use tracing::Instrument;

pub(crate) type ProviderError = Box<dyn ModelProviderError>;
type SendRequestResult = Result<ModelClientResponse, ProviderError>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type DeltaFn = Box<dyn Fn(String) + Send + 'static>;
#[rustfmt::skip]
type HandlerFn = Arc<
    dyn Fn(ModelRequest, u64, DeltaFn) -> BoxedSendRequestFuture + Send + Sync
>;

const INITIAL_RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// A type-erased handle to a model provider.
///
/// Agents and run configurations hold this instead of a generic provider
/// parameter, so they can be stored and cloned freely.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        let provider = Arc::new(provider);
        let handler_fn: HandlerFn =
            Arc::new(move |req, max_retries, on_delta| {
                let provider = Arc::clone(&provider);
                Box::pin(
                    async move {
                        trace!("got a request: {:?}", req);
                        let resp =
                            connect(&*provider, &req, max_retries).await?;
                        handle_response::<P>(resp, on_delta).await
                    }
                    .instrument(trace_span!("model client req")),
                )
            });
        Self { handler_fn }
    }

    /// Sends a request and collects the whole response.
    ///
    /// Failing to start the response is retried up to `max_retries`
    /// times when the provider reports a retryable error. Errors while
    /// streaming are returned as-is, since deltas were already emitted.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. The response stops streaming further
    /// events when this operation is cancelled.
    #[inline]
    pub async fn send_request(
        &self,
        req: ModelRequest,
        max_retries: u64,
        on_delta: impl Fn(String) + Send + 'static,
    ) -> SendRequestResult {
        (self.handler_fn)(req, max_retries, Box::new(on_delta)).await
    }
}

/// A completely received response from the model client.
#[derive(Clone, Debug, Default)]
pub struct ModelClientResponse {
    pub text: String,
    /// Tool calls requested by the model.
    pub tool_calls: Vec<ToolCallRequest>,
    /// The reason the model finished generating.
    pub finish_reason: Option<ModelFinishReason>,
}

impl ModelClientResponse {
    #[inline]
    pub fn into_message(self) -> AssistantMessage {
        AssistantMessage {
            content: self.text,
            tool_calls: self.tool_calls,
        }
    }
}

async fn connect<P: ModelProvider>(
    provider: &P,
    req: &ModelRequest,
    max_retries: u64,
) -> Result<P::Response, ProviderError> {
    let policy = ExponentialBackoffBuilder::new()
        .with_initial_interval(INITIAL_RETRY_INTERVAL)
        .with_max_elapsed_time(None)
        .build();

    let mut attempt = 0;
    let result = backoff::future::retry_notify(
        policy,
        || {
            attempt += 1;
            let this_attempt = attempt;
            let fut = provider.send_request(req);
            async move {
                fut.await.map_err(|err| {
                    if err.kind().is_retryable() && this_attempt <= max_retries
                    {
                        backoff::Error::transient(err)
                    } else {
                        backoff::Error::permanent(err)
                    }
                })
            }
        },
        |err: P::Error, after: Duration| {
            warn!("model request failed: {err}, retrying after {after:?}");
        },
    )
    .await;

    result.map_err(|err| {
        error!("got an error: {err:?}");
        Box::new(err) as ProviderError
    })
}

async fn handle_response<P: ModelProvider + 'static>(
    resp: P::Response,
    on_delta: DeltaFn,
) -> SendRequestResult {
    let mut collected = ModelClientResponse::default();

    trace!("start receiving events");

    let mut pinned_resp = pin!(resp);
    loop {
        let event_or_err =
            poll_fn(|cx| pinned_resp.as_mut().poll_next_event(cx)).await;
        let event = match event_or_err {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(err) => {
                error!("got an error: {err:?}");
                return Err(Box::new(err));
            }
        };
        trace!("got an event: {event:?}");

        match event {
            ModelResponseEvent::MessageDelta(msg) => {
                collected.text.push_str(&msg);
                on_delta(msg);
            }
            ModelResponseEvent::ToolCall(req) => {
                collected.tool_calls.push(req);
            }
            ModelResponseEvent::Completed(reason) => {
                collected.finish_reason = Some(reason);
            }
        }
    }

    trace!("finished a request");
    Ok(collected)
}
