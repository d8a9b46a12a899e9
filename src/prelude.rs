//! A "prelude" for users of the `animestream-core` crate.
//!
//! Re-exports the types needed to assemble an application, plug in a custom
//! backend or surface, and register extra routes.
//!
//! # Example
//!
//! ```
//! use animestream_core::prelude::*;
//! ```

pub use crate::{
    // Assembly
    App,
    AppBuilder,
    AppConfig,
    AppError,
    // Seams
    ApiClient,
    Envelope,
    Surface,
    NoticeKind,
    RouteHandler,
    RouteParams,
    // Search cancellation
    CancellationToken,
    Cancelled,
    // Essential re-export for trait implementation
    async_trait,
};
