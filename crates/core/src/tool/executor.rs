use std::collections::HashMap;
use std::future::ready;
use std::pin::Pin;
use std::sync::Arc;

use dialset_model::ToolCallRequest;

use crate::tool::{Error, ToolObject, ToolResult};

type ToolFuture = Pin<Box<dyn Future<Output = ToolResult> + Send>>;

/// An executor that handles tool call requests from the model.
pub struct Executor {
    tools: HashMap<String, Arc<dyn ToolObject>>,
}

impl Executor {
    /// Creates an executor over `tools`. If two tools share a name, the
    /// first one registered wins.
    pub fn with_tools(tools: &[Arc<dyn ToolObject>]) -> Self {
        let mut tool_map = HashMap::with_capacity(tools.len());
        for tool in tools {
            tool_map
                .entry(tool.name().to_owned())
                .or_insert_with(|| Arc::clone(tool));
        }
        Self { tools: tool_map }
    }

    /// Turns every request into a future, in request order.
    ///
    /// A request for an unknown tool still gets a future, which resolves
    /// to a `NotFound` error, so every request has a result.
    pub fn handle_requests<S>(&self, requests: &[ToolCallRequest], spawner: S)
    where
        S: FnMut(&ToolCallRequest, ToolFuture),
    {
        let mut spawner = spawner;

        let span = debug_span!("tool executor");
        let _enter = span.enter();
        for req in requests {
            let Some(tool) = self.tools.get(&req.name) else {
                warn!("tool not found: {}", req.name);
                let err = Error::not_found().with_reason(format!(
                    "no tool named `{}` is available",
                    req.name
                ));
                spawner(req, Box::pin(ready(Err(err))));
                continue;
            };
            trace!("spawning a tool ({}) with args: {:?}", req.id, req.arguments);
            spawner(req, tool.execute(req.arguments.clone()));
        }
    }

    /// Executes all requests and returns their results in request order.
    ///
    /// With `parallel` set, the tools run concurrently on separate tasks,
    /// otherwise they run one after another.
    pub async fn execute_all(
        &self,
        requests: &[ToolCallRequest],
        parallel: bool,
    ) -> Vec<ToolResult> {
        let mut futures = Vec::with_capacity(requests.len());
        self.handle_requests(requests, |_, fut| futures.push(fut));

        let mut results = Vec::with_capacity(futures.len());
        if parallel {
            let handles: Vec<_> = futures.into_iter().map(tokio::spawn).collect();
            for handle in handles {
                let result = handle.await.unwrap_or_else(|err| {
                    error!("tool task failed: {err}");
                    Err(Error::execution_error().with_reason(err.to_string()))
                });
                results.push(result);
            }
        } else {
            for fut in futures {
                results.push(fut.await);
            }
        }
        results
    }
}
