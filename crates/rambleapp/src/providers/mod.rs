//! HTTP clients for the two external services.
//!
//! - [`unsplash::UnsplashClient`] implements [`crate::search::ImageSearchProvider`].
//! - [`openrouter::OpenRouterClient`] implements [`crate::keywords::RewriteProvider`].
//!
//! Both build their `reqwest::Client` with the configured request timeout, so
//! a hung provider surfaces as [`crate::error::ProviderError::Http`] and the
//! engine degrades the usual way. Response decoding lives in plain functions
//! so it can be tested without a network.

pub mod openrouter;
pub mod unsplash;

pub use openrouter::OpenRouterClient;
pub use unsplash::UnsplashClient;

use crate::error::ProviderError;
use reqwest::StatusCode;

/// Error for a non-2xx response. 503 means the service is down rather than
/// the request being wrong.
pub(crate) fn status_error(status: StatusCode, body: String) -> ProviderError {
    if status == StatusCode::SERVICE_UNAVAILABLE {
        return ProviderError::Unavailable;
    }
    ProviderError::Status {
        status: status.as_u16(),
        body,
    }
}
