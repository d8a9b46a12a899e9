//! Error types shared across the crate.
//!
//! Failures are absorbed close to where they happen. The API client folds
//! transport and HTTP errors into a non-success [`Envelope`](crate::api::Envelope),
//! route handlers bubble anything up as `anyhow::Error` to the router, and the
//! router turns it into the not-found view. Cancellation has its own type,
//! [`Cancelled`](crate::cancellation::Cancelled), so it cannot be confused with
//! any of the errors below.

use thiserror::Error;

/// Errors raised while assembling or driving an [`App`](crate::App).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Navigation channel closed")]
    ChannelClosed,

    #[error("{0}")]
    GeneralError(String),
}

/// Errors produced while talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with `success: false` (or left out `data`).
    #[error("{0}")]
    Upstream(String),
}

/// Errors raised by route handlers while reading their parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("missing route parameter `{0}`")]
    MissingParameter(String),

    #[error("route parameter `{name}` is not valid percent-encoded UTF-8")]
    InvalidEncoding { name: String },
}
