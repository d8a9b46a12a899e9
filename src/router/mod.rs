//! # Router Module
//!
//! Fragment-based routing.
//!
//! ## Overview
//!
//! Routes are `/`-delimited patterns such as `/anime/:id`, registered in
//! order against async handlers. The [`Location`] holds the current `#...`
//! fragment and queues a [`NavigationEvent`] whenever it changes; the spawned
//! [`Router`] loop resolves each event's path and runs the matching handler.
//!
//! ## Example
//!
//! ```rust,ignore
//! let (location, events) = Location::new();
//! let router = Router::new(location.clone(), surface)
//!     .route("/", |_params: RouteParams| async { anyhow::Ok(()) })
//!     .route("/anime/:id", |params: RouteParams| async move {
//!         println!("showing {}", params.require("id")?);
//!         Ok(())
//!     });
//! let handle = router.spawn(events);
//! location.navigate("/anime/42");
//! ```

mod core;
mod location;
mod params;
mod pattern;

pub use self::core::{Route, RouteHandler, Router};
pub use location::{FRAGMENT_MARKER, Location, NavigationEvent};
pub use params::RouteParams;
pub use pattern::{PARAM_MARKER, RoutePattern};
