//! # Builder Module
//!
//! Provides the `AppBuilder`, a fluent API for assembling an [`App`] from its
//! collaborators.
//!
//! ## Overview
//!
//! The application needs a display surface and a backend. The surface must
//! always be supplied; the backend defaults to an [`HttpApiClient`] pointed at
//! the configured base URL, and can be swapped for any other [`ApiClient`]
//! (a test double, for instance). Everything else has a usable default in
//! [`AppConfig`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use animestream_core::{AppBuilder, MemorySurface};
//! use std::{sync::Arc, time::Duration};
//!
//! let app = AppBuilder::new()
//!     .surface(Arc::new(MemorySurface::new()))
//!     .debounce_delay(Duration::from_millis(250))
//!     .initial_hash("#/anime/42")
//!     .build()?;
//! app.start()?;
//! ```

use crate::api::{ApiClient, DEFAULT_BASE_URL, HttpApiClient};
use crate::app::App;
use crate::controller::PageController;
use crate::error::AppError;
use crate::render::Surface;
use crate::router::{Location, Router};
use crate::stats::NavigationStats;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

/// Tunables for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Quiet period after the last keystroke before a search is issued.
    pub debounce_delay: Duration,
    /// Skeleton cards shown while the home listing loads.
    pub home_skeletons: usize,
    /// Skeleton cards shown while search results load.
    pub search_skeletons: usize,
    /// Root of the backend API.
    pub base_url: String,
    /// Sent as `Accept-Language` with every request.
    pub language: String,
    /// Document title set on start.
    pub title: String,
    /// How long [`App::shutdown`] waits for the router loop.
    pub shutdown_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            debounce_delay: Duration::from_millis(300),
            home_skeletons: 12,
            search_skeletons: 8,
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "en-US".to_string(),
            title: "AnimeStream - Watch Your Favorite Anime".to_string(),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl AppConfig {
    fn validate(&self) -> Result<(), AppError> {
        if self.debounce_delay.is_zero() {
            return Err(AppError::ConfigurationError(
                "debounce_delay must be greater than zero".to_string(),
            ));
        }
        if self.home_skeletons == 0 || self.search_skeletons == 0 {
            return Err(AppError::ConfigurationError(
                "skeleton counts must be greater than zero".to_string(),
            ));
        }
        if self.shutdown_timeout.is_zero() {
            return Err(AppError::ConfigurationError(
                "shutdown_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Assembles an [`App`].
#[derive(Default)]
pub struct AppBuilder {
    config: AppConfig,
    api: Option<Arc<dyn ApiClient>>,
    surface: Option<Arc<dyn Surface>>,
    initial_hash: String,
}

impl AppBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the search debounce delay.
    pub fn debounce_delay(mut self, delay: Duration) -> Self {
        self.config.debounce_delay = delay;
        self
    }

    /// Sets the number of skeleton cards on the home page.
    pub fn home_skeletons(mut self, count: usize) -> Self {
        self.config.home_skeletons = count;
        self
    }

    /// Sets the number of skeleton cards on the search page.
    pub fn search_skeletons(mut self, count: usize) -> Self {
        self.config.search_skeletons = count;
        self
    }

    /// Sets the backend base URL used by the default HTTP client.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Sets the language sent to the backend.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Uses `api` instead of the default HTTP client.
    pub fn api_client(mut self, api: Arc<dyn ApiClient>) -> Self {
        self.api = Some(api);
        self
    }

    /// Sets the display surface. Required.
    pub fn surface(mut self, surface: Arc<dyn Surface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Sets the fragment the application starts at, e.g. `#/search/naruto`.
    pub fn initial_hash(mut self, hash: impl Into<String>) -> Self {
        self.initial_hash = hash.into();
        self
    }

    /// Validates the configuration and wires the application together.
    ///
    /// Must be called from within a tokio runtime. The app keeps a handle to
    /// that runtime, so its methods can later be called from any thread.
    pub fn build(self) -> Result<App, AppError> {
        self.config.validate()?;

        let surface = self.surface.ok_or_else(|| {
            AppError::ConfigurationError("a display surface is required".to_string())
        })?;

        let api: Arc<dyn ApiClient> = match self.api {
            Some(api) => api,
            None => {
                debug!("Using HTTP backend at {}", self.config.base_url);
                Arc::new(
                    HttpApiClient::new(&self.config.base_url)?
                        .language(self.config.language.clone()),
                )
            }
        };

        let runtime = Handle::try_current().map_err(|_| {
            AppError::ConfigurationError(
                "AppBuilder::build must be called from within a tokio runtime".to_string(),
            )
        })?;

        let (location, events) = Location::with_hash(&self.initial_hash);
        let stats = Arc::new(NavigationStats::new());
        let controller = PageController::new(
            api,
            Arc::clone(&surface),
            location.clone(),
            self.config.clone(),
            Arc::clone(&stats),
            runtime,
        );
        let router = controller.register_routes(
            Router::new(location.clone(), Arc::clone(&surface)).with_stats(Arc::clone(&stats)),
        );

        Ok(App::new(
            router, events, location, controller, surface, self.config, stats,
        ))
    }
}
