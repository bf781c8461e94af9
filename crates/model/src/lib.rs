//! Provider-agnostic types for talking to LLMs.
//!
//! This crate defines the protocol between the agent runtime and the
//! model providers: requests, streamed responses, errors, and the
//! [`ModelSettings`] bundle that tunes each request.
//!
//! Apart from [`ModelSettings::resolve`], types in this crate don't
//! define any behavior. They are the constraints that provider
//! implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;
mod settings;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
pub use settings::*;
