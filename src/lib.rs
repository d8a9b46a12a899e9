//! # animestream-core
//!
//! Headless core of the AnimeStream single-page browser.
//!
//! Provides the fragment router, the page controller with debounced and
//! cancellable search, the backend client and the markup that the views are
//! built from. Rendering goes through the [`Surface`] trait, so the same core
//! can drive a browser embedding or run entirely in memory.
//!
//! ## Example
//!
//! ```rust,ignore
//! use animestream_core::{AppBuilder, MemorySurface};
//! use std::sync::Arc;
//!
//! async fn run() -> Result<(), animestream_core::AppError> {
//!     let surface = Arc::new(MemorySurface::new());
//!     let app = AppBuilder::new().surface(surface.clone()).build()?;
//!     app.start()?;
//!
//!     app.input_changed("frieren");
//!     app.wait_idle().await;
//!     println!("{}", surface.content());
//!
//!     app.shutdown().await
//! }
//! ```

pub mod api;
pub mod app;
pub mod builder;
pub mod cancellation;
pub mod controller;
pub mod error;
pub mod prelude;
pub mod render;
pub mod router;
pub mod state;
pub mod stats;

#[cfg(test)]
mod testing;

pub use api::{Anime, ApiClient, Envelope, Episode, HttpApiClient};
pub use app::App;
pub use builder::{AppBuilder, AppConfig};
pub use cancellation::{Cancelled, CancellationToken};
pub use controller::PageController;
pub use error::{ApiError, AppError, RouteError};
pub use render::{MemorySurface, NoticeKind, Surface};
pub use router::{Location, RouteHandler, RouteParams, Router};
pub use state::NavigationState;
pub use stats::NavigationStats;

pub use async_trait::async_trait;
pub use tokio;
