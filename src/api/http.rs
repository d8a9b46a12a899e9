//! `reqwest`-backed implementation of [`ApiClient`].
//!
//! Every failure on the way to a decoded body (transport error, non-2xx
//! status, malformed JSON) is logged and folded into a non-success
//! [`Envelope`] carrying a short, user-facing message.

use super::{Anime, ApiClient, DEFAULT_SEASON, Envelope, Episode};
use crate::error::{ApiError, AppError};
use async_trait::async_trait;
use log::{debug, error, trace};
use reqwest::header::ACCEPT_LANGUAGE;
use serde::de::DeserializeOwned;
use std::time::Instant;
use url::Url;

/// The backend the application talks to unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://anime-backend-jdc9.onrender.com/api/tmdb";

const LISTING_FAILED: &str = "Failed to fetch anime";
const ANIME_NOT_FOUND: &str = "Anime not found";
const SEASON_NOT_FOUND: &str = "Season not found";

/// HTTP client for the anime backend.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: Url,
    language: String,
}

impl HttpApiClient {
    /// Creates a client for `base_url` with a default `reqwest::Client`.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        Self::with_client(reqwest::Client::builder().build()?, base_url)
    }

    /// Creates a client for `base_url` reusing an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::ConfigurationError(format!(
                "base URL `{}` cannot carry path segments.",
                base_url
            )));
        }
        Ok(Self {
            client,
            base_url,
            language: "en-US".to_string(),
        })
    }

    /// Sets the language sent as `Accept-Language`.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_envelope<T>(&self, url: Url, failure: &str) -> Envelope<T>
    where
        T: DeserializeOwned,
    {
        let start_time = Instant::now();
        match self.request(url.clone()).await {
            Ok(envelope) => {
                trace!("Fetched {} in {:?}", url, start_time.elapsed());
                envelope
            }
            Err(e) => {
                error!("Backend fetch failed: {}", e);
                debug!("Request to {} failed after {:?}", url, start_time.elapsed());
                Envelope::failure(failure)
            }
        }
    }

    async fn request<T>(&self, url: Url) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        trace!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT_LANGUAGE, &self.language)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Envelope<T>>()
            .await
            .map_err(|source| ApiError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn fetch_anime(&self, query: Option<&str>) -> Envelope<Vec<Anime>> {
        let mut url = self.endpoint(&["anime"]);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.query_pairs_mut().append_pair("q", query);
        }
        self.get_envelope(url, LISTING_FAILED).await
    }

    async fn fetch_anime_by_id(&self, id: &str) -> Envelope<Anime> {
        let url = self.endpoint(&["anime", id]);
        self.get_envelope(url, ANIME_NOT_FOUND).await
    }

    async fn fetch_episodes(&self, anime_id: &str, season: Option<u32>) -> Envelope<Vec<Episode>> {
        let season = season.unwrap_or(DEFAULT_SEASON).to_string();
        let url = self.endpoint(&["anime", anime_id, "season", &season]);
        self.get_envelope(url, SEASON_NOT_FOUND).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancellation::{Cancelled, CancellationToken};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpApiClient {
        HttpApiClient::new(&format!("{}/api/tmdb", server.uri())).unwrap()
    }

    fn listing_body() -> serde_json::Value {
        json!({
            "success": true,
            "data": [
                {"id": 37854, "title": "One Piece", "rating": 8.7, "genres": ["Adventure"]}
            ]
        })
    }

    #[tokio::test]
    async fn fetch_anime_reads_the_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tmdb/anime"))
            .and(header("accept-language", "ja-JP"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body()))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client_for(&server).language("ja-JP").fetch_anime(None).await;
        let listing = envelope.into_result().unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].id, "37854");
    }

    #[tokio::test]
    async fn records_with_null_fields_keep_the_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tmdb/anime"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    {"id": 1, "title": "A", "poster": null, "synopsis": null, "rating": null},
                    {"id": 2, "title": "B", "poster": "/b.jpg"}
                ]
            })))
            .mount(&server)
            .await;

        let listing = client_for(&server).fetch_anime(None).await.into_result().unwrap();
        assert_eq!(listing.len(), 2);
        assert!(listing[0].poster.is_empty());
    }

    #[tokio::test]
    async fn ids_are_encoded_once_in_the_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tmdb/anime/a%20b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"id": "a b", "title": "Spaced Out"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let anime = client_for(&server)
            .fetch_anime_by_id("a b")
            .await
            .into_result()
            .unwrap();
        assert_eq!(anime.title, "Spaced Out");
    }

    #[tokio::test]
    async fn fetch_anime_sends_the_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tmdb/anime"))
            .and(query_param("q", "one piece"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body()))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client_for(&server).fetch_anime(Some("one piece")).await;
        assert!(envelope.is_success());
    }

    #[tokio::test]
    async fn non_success_status_becomes_a_failed_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tmdb/anime/999"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let envelope = client_for(&server).fetch_anime_by_id("999").await;
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("Anime not found"));
    }

    #[tokio::test]
    async fn malformed_body_becomes_a_failed_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tmdb/anime"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let envelope = client_for(&server).fetch_anime(None).await;
        assert_eq!(envelope.error.as_deref(), Some("Failed to fetch anime"));
    }

    #[tokio::test]
    async fn fetch_episodes_defaults_to_the_first_season() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tmdb/anime/42/season/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{"id": 1, "episodeNumber": 1, "title": "Pilot", "duration": "24m"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tmdb/anime/42/season/2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let episodes = client.fetch_episodes("42", None).await.into_result().unwrap();
        assert_eq!(episodes[0].title, "Pilot");

        let second = client.fetch_episodes("42", Some(2)).await;
        assert_eq!(second.error.as_deref(), Some("Season not found"));
    }

    #[tokio::test]
    async fn transport_failure_becomes_a_failed_envelope() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        drop(server);

        let envelope = client.fetch_anime(None).await;
        assert!(!envelope.success);
    }

    #[tokio::test]
    async fn cancelled_search_never_reaches_the_backend() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body()))
            .expect(0)
            .mount(&server)
            .await;

        let token = CancellationToken::new();
        token.cancel();
        let result = client_for(&server).search_anime("naruto", &token).await;
        assert_eq!(result, Err(Cancelled));
    }

    #[tokio::test]
    async fn search_cancelled_while_in_flight() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tmdb/anime"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(listing_body())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let token = CancellationToken::new();
        let canceller = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                token.cancel();
            })
        };

        let result = client_for(&server).search_anime("naruto", &token).await;
        assert_eq!(result, Err(Cancelled));
        canceller.await.unwrap();
    }

    #[test]
    fn rejects_base_urls_without_a_path() {
        assert!(HttpApiClient::new("mailto:someone@example.com").is_err());
        assert!(HttpApiClient::new("not a url").is_err());
    }
}
