//! Cooperative cancellation for in-flight searches.
//!
//! Searches carry a [`CancellationToken`] from `tokio-util`. Cancelling any
//! clone cancels all of them. Work that honours the token either polls
//! [`CancellationToken::is_cancelled`] or races against
//! [`CancellationToken::cancelled`], and reports the outcome as [`Cancelled`]
//! rather than as a failure.

use thiserror::Error;

pub use tokio_util::sync::CancellationToken;

/// Outcome of an operation whose token was cancelled before it resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;
