use std::error::Error;

use crate::error::ErrorKind;
use crate::request::ModelRequest;
use crate::response::ModelResponse;

/// The error type for a model provider.
pub trait ModelProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// An entry for sampling requests from some model.
///
/// Providers should be stateless from the caller's point of view, since
/// the runner may share one provider between agents and drop it at any
/// time.
///
/// Settings arrive already resolved in [`ModelRequest::settings`]. A
/// provider should translate the fields it understands and silently
/// ignore the rest; unset fields mean the provider's own defaults.
pub trait ModelProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: ModelProviderError;

    /// The response type for this provider.
    type Response: ModelResponse<Error = Self::Error>;

    /// Sends a request to the model.
    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static;
}
