//! In-memory backend used by the crate's tests.

use crate::api::{Anime, ApiClient, Envelope, Episode};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct FakeState {
    listing: Vec<Anime>,
    listing_fails: bool,
    details_fail: bool,
    episodes_fail: bool,
    search_fails: bool,
    results: HashMap<String, Vec<Anime>>,
    delays: HashMap<String, Duration>,
    listing_requests: usize,
    searches: Vec<String>,
    detail_requests: Vec<String>,
}

/// A configurable [`ApiClient`] that records what it was asked for.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

pub(crate) fn anime(id: &str, title: &str) -> Anime {
    Anime {
        id: id.to_string(),
        title: title.to_string(),
        poster: format!("https://img.example/{}.jpg", id),
        rating: 8.5,
        genres: vec!["Action".to_string()],
        year: Some(2020),
        episodes: Some(2),
        status: "Finished".to_string(),
        synopsis: format!("Synopsis of {}", title),
    }
}

fn episodes_of(anime_id: &str) -> Vec<Episode> {
    (1..=2)
        .map(|n| Episode {
            id: format!("{}-{}", anime_id, n),
            episode_number: n,
            title: format!("Episode {}", n),
            thumbnail: String::new(),
            duration: "24".to_string(),
            video_url: String::new(),
        })
        .collect()
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_listing(self, entries: &[(&str, &str)]) -> Self {
        self.state.lock().listing = entries.iter().map(|(id, title)| anime(id, title)).collect();
        self
    }

    pub(crate) fn with_results(self, query: &str, entries: &[(&str, &str)]) -> Self {
        self.state.lock().results.insert(
            query.to_string(),
            entries.iter().map(|(id, title)| anime(id, title)).collect(),
        );
        self
    }

    /// Makes searches for `query` take `delay` before answering.
    pub(crate) fn with_search_delay(self, query: &str, delay: Duration) -> Self {
        self.state.lock().delays.insert(query.to_string(), delay);
        self
    }

    pub(crate) fn failing_listing(self) -> Self {
        self.state.lock().listing_fails = true;
        self
    }

    pub(crate) fn failing_details(self) -> Self {
        self.state.lock().details_fail = true;
        self
    }

    pub(crate) fn failing_episodes(self) -> Self {
        self.state.lock().episodes_fail = true;
        self
    }

    pub(crate) fn failing_search(self) -> Self {
        self.state.lock().search_fails = true;
        self
    }

    pub(crate) fn listing_requests(&self) -> usize {
        self.state.lock().listing_requests
    }

    pub(crate) fn searches(&self) -> Vec<String> {
        self.state.lock().searches.clone()
    }

    pub(crate) fn detail_requests(&self) -> Vec<String> {
        self.state.lock().detail_requests.clone()
    }
}

#[async_trait]
impl ApiClient for FakeApi {
    async fn fetch_anime(&self, query: Option<&str>) -> Envelope<Vec<Anime>> {
        let Some(query) = query else {
            let mut state = self.state.lock();
            state.listing_requests += 1;
            return if state.listing_fails {
                Envelope::failure("Failed to fetch anime")
            } else {
                Envelope::ok(state.listing.clone())
            };
        };

        let delay = {
            let mut state = self.state.lock();
            state.searches.push(query.to_string());
            state.delays.get(query).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock();
        if state.search_fails {
            Envelope::failure("Failed to fetch anime")
        } else {
            Envelope::ok(state.results.get(query).cloned().unwrap_or_default())
        }
    }

    async fn fetch_anime_by_id(&self, id: &str) -> Envelope<Anime> {
        let mut state = self.state.lock();
        state.detail_requests.push(id.to_string());
        if state.details_fail {
            return Envelope::failure("Anime not found");
        }
        match state.listing.iter().find(|anime| anime.id == id) {
            Some(anime) => Envelope::ok(anime.clone()),
            None => Envelope::failure("Anime not found"),
        }
    }

    async fn fetch_episodes(&self, anime_id: &str, _season: Option<u32>) -> Envelope<Vec<Episode>> {
        if self.state.lock().episodes_fail {
            Envelope::failure("Season not found")
        } else {
            Envelope::ok(episodes_of(anime_id))
        }
    }
}
