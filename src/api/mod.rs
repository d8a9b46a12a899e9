//! # API Module
//!
//! The contract between the page controller and the backend.
//!
//! ## Overview
//!
//! Every backend call answers with an [`Envelope`]: `{success, data, error}`.
//! Implementations of [`ApiClient`] never return transport or HTTP failures as
//! `Err`; they fold them into a non-success envelope, so callers always branch
//! on `success`. The one exception is [`ApiClient::search_anime`], which
//! reports a cancelled token as [`Cancelled`] so that a superseded search can
//! be told apart from a failed one.
//!
//! ## Example
//!
//! ```rust,ignore
//! use animestream_core::api::{ApiClient, HttpApiClient};
//! use animestream_core::CancellationToken;
//!
//! let client = HttpApiClient::new("https://anime-backend-jdc9.onrender.com/api/tmdb")?;
//! let token = CancellationToken::new();
//! match client.search_anime("one piece", &token).await {
//!     Ok(envelope) if envelope.success => { /* render */ }
//!     Ok(envelope) => eprintln!("search failed: {:?}", envelope.error),
//!     Err(_cancelled) => { /* superseded, ignore */ }
//! }
//! ```

mod http;
mod model;

pub use http::{DEFAULT_BASE_URL, HttpApiClient};
pub use model::{Anime, Episode};

use crate::cancellation::{Cancelled, CancellationToken};
use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Season requested by [`ApiClient::fetch_episodes`] when none is given.
pub const DEFAULT_SEASON: u32 = 1;

/// The `{success, data, error}` wrapper every backend call returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// A successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failed envelope carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// `true` when the call succeeded and produced data.
    pub fn is_success(&self) -> bool {
        self.success && self.data.is_some()
    }

    /// Converts the envelope into a `Result`, gated by `success`.
    pub fn into_result(self) -> Result<T, ApiError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(ApiError::Upstream(
                "backend reported success without data".to_string(),
            )),
            (false, _) => Err(ApiError::Upstream(
                self.error
                    .unwrap_or_else(|| "backend reported a failure".to_string()),
            )),
        }
    }
}

/// Defines the backend operations the page controller relies on.
#[async_trait]
pub trait ApiClient: Send + Sync + 'static {
    /// Fetches the anime listing, optionally filtered by `query`.
    async fn fetch_anime(&self, query: Option<&str>) -> Envelope<Vec<Anime>>;

    /// Fetches a single anime by id.
    async fn fetch_anime_by_id(&self, id: &str) -> Envelope<Anime>;

    /// Fetches the episodes of one season, [`DEFAULT_SEASON`] when `season` is `None`.
    async fn fetch_episodes(&self, anime_id: &str, season: Option<u32>) -> Envelope<Vec<Episode>>;

    /// Searches the listing for `query`.
    ///
    /// Fails with [`Cancelled`] if `token` is already cancelled when called, or
    /// becomes cancelled before the backend answers.
    async fn search_anime(
        &self,
        query: &str,
        token: &CancellationToken,
    ) -> Result<Envelope<Vec<Anime>>, Cancelled> {
        if token.is_cancelled() {
            return Err(Cancelled);
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => Err(Cancelled),
            envelope = self.fetch_anime(Some(query)) => Ok(envelope),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct SlowListing;

    #[async_trait]
    impl ApiClient for SlowListing {
        async fn fetch_anime(&self, _query: Option<&str>) -> Envelope<Vec<Anime>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Envelope::ok(Vec::new())
        }

        async fn fetch_anime_by_id(&self, _id: &str) -> Envelope<Anime> {
            Envelope::failure("Anime not found")
        }

        async fn fetch_episodes(&self, _anime_id: &str, _season: Option<u32>) -> Envelope<Vec<Episode>> {
            Envelope::failure("Season not found")
        }
    }

    #[test]
    fn into_result_is_gated_by_success() {
        assert_eq!(Envelope::ok(3).into_result().unwrap(), 3);

        let err = Envelope::<u8>::failure("Anime not found").into_result().unwrap_err();
        assert_eq!(err.to_string(), "Anime not found");

        let missing = Envelope::<u8> {
            success: true,
            data: None,
            error: None,
        };
        assert!(!missing.is_success());
        assert!(missing.into_result().is_err());
    }

    #[test]
    fn envelope_deserializes_without_optional_fields() {
        let envelope: Envelope<Vec<u8>> =
            serde_json::from_str(r#"{"success":false,"error":"boom"}"#).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.data, None);
        assert_eq!(envelope.error.as_deref(), Some("boom"));
    }

    #[tokio::test(start_paused = true)]
    async fn search_fails_fast_on_cancelled_token() {
        let token = CancellationToken::new();
        token.cancel();
        let started = tokio::time::Instant::now();

        assert_eq!(SlowListing.search_anime("naruto", &token).await, Err(Cancelled));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn search_stops_when_cancelled_in_flight() {
        let token = CancellationToken::new();
        let canceller = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                token.cancel();
            })
        };

        let started = tokio::time::Instant::now();
        assert_eq!(SlowListing.search_anime("naruto", &token).await, Err(Cancelled));
        assert!(started.elapsed() < Duration::from_secs(1));
        canceller.await.unwrap();
    }
}
