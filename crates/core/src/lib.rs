//! Agent definitions and the runner that drives them.
//!
//! An [`Agent`] carries a fixed set of [`ModelSettings`]; a
//! [`RunConfig`] may carry another set for one execution. The
//! [`Runner`] resolves the two (run-level wins field by field) and
//! sends the effective settings with every model request.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod agent;
mod context;
pub mod hooks;
mod model_client;
mod run;
pub mod tool;

pub use agent::{Agent, AgentBuilder, Instructions};
pub use context::RunContext;
pub use dialset_model::{ModelSettings, ToolChoice, Truncation};
pub use run::{
    DEFAULT_MAX_RETRIES, DEFAULT_MAX_TURNS, ModelInputData, RunConfig,
    RunError, RunItem, RunResult, RunStream, Runner, StreamEvent,
};
