//! The route table and the loop that drives it.
//!
//! A [`Router`] owns an ordered list of [`Route`]s. Once spawned, it drains
//! the [`Location`]'s event queue one event at a time: the path is resolved
//! against the table, the first structural match wins, and its handler runs
//! to completion before the next event is looked at. Whatever goes wrong in
//! between (no match, a handler error, a handler panic) ends in the
//! not-found view; nothing is reported back to whoever navigated.

use super::location::{Location, NavigationEvent, path_of};
use super::params::RouteParams;
use super::pattern::RoutePattern;
use crate::render::{Surface, markup};
use crate::state::NavigationState;
use crate::stats::NavigationStats;
use async_trait::async_trait;
use kanal::AsyncReceiver;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

/// An async route handler.
///
/// Implemented for any `Fn(RouteParams) -> impl Future<Output = anyhow::Result<()>>`,
/// so plain async closures can be registered directly.
#[async_trait]
pub trait RouteHandler: Send + Sync + 'static {
    async fn handle(&self, params: RouteParams) -> anyhow::Result<()>;
}

#[async_trait]
impl<F, Fut> RouteHandler for F
where
    F: Fn(RouteParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn handle(&self, params: RouteParams) -> anyhow::Result<()> {
        (self)(params).await
    }
}

/// A pattern together with the handler it dispatches to.
#[derive(Clone)]
pub struct Route {
    pattern: RoutePattern,
    handler: Arc<dyn RouteHandler>,
}

impl Route {
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route").field("pattern", &self.pattern).finish()
    }
}

/// Maps fragment paths to handlers.
pub struct Router {
    routes: Vec<Route>,
    location: Location,
    surface: Arc<dyn Surface>,
    state: Arc<NavigationState>,
    stats: Arc<NavigationStats>,
}

impl Router {
    /// Creates an empty router listening to `location` and rendering fallback
    /// views into `surface`.
    pub fn new(location: Location, surface: Arc<dyn Surface>) -> Self {
        Self {
            routes: Vec::new(),
            location,
            surface,
            state: NavigationState::new(),
            stats: Arc::new(NavigationStats::new()),
        }
    }

    /// Shares `stats` with the router instead of its own collector.
    pub fn with_stats(mut self, stats: Arc<NavigationStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Adds a route, builder style.
    pub fn route<H: RouteHandler>(mut self, pattern: &str, handler: H) -> Self {
        self.register(pattern, handler);
        self
    }

    /// Adds a route. Registering a pattern twice replaces the earlier handler
    /// and keeps its position.
    pub fn register<H: RouteHandler>(&mut self, pattern: &str, handler: H) {
        let handler: Arc<dyn RouteHandler> = Arc::new(handler);
        if let Some(existing) = self.routes.iter_mut().find(|r| r.pattern.as_str() == pattern) {
            debug!("Replacing handler for route {}", pattern);
            existing.handler = handler;
            return;
        }
        trace!("Registering route {}", pattern);
        self.routes.push(Route {
            pattern: RoutePattern::parse(pattern),
            handler,
        });
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn state(&self) -> Arc<NavigationState> {
        Arc::clone(&self.state)
    }

    pub fn stats(&self) -> Arc<NavigationStats> {
        Arc::clone(&self.stats)
    }

    /// Sets the fragment to `path`. The handler runs later, from the loop.
    pub fn navigate(&self, path: &str) {
        self.location.navigate(path);
    }

    /// The path portion of the current fragment, or `/`.
    pub fn current_path(&self) -> String {
        self.location.current_path()
    }

    /// Finds the first route matching `path` and binds its parameters.
    pub fn resolve(&self, path: &str) -> Option<(&Route, RouteParams)> {
        self.routes
            .iter()
            .find_map(|route| route.pattern.extract(path).map(|params| (route, params)))
    }

    /// Resolves `path` and runs its handler, falling back to the not-found view.
    pub async fn handle_route_change(&self, path: &str) {
        self.state.begin(path);
        self.stats.increment_navigations();

        match self.resolve(path) {
            Some((route, params)) => {
                trace!("Path {} matched route {}", path, route.pattern);
                self.state.matched(path);
                self.stats.record_route_hit(route.pattern.as_str());

                let handler = Arc::clone(&route.handler);
                let outcome = tokio::spawn(async move { handler.handle(params).await }).await;
                match outcome {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        error!("Route handler for {} failed: {:#}", path, e);
                        self.stats.increment_handler_faults();
                        self.render_not_found();
                    }
                    Err(e) => {
                        error!("Route handler for {} panicked: {}", path, e);
                        self.stats.increment_handler_faults();
                        self.render_not_found();
                    }
                }
            }
            None => {
                debug!("No route matches {}", path);
                self.render_not_found();
            }
        }

        self.state.finish();
    }

    fn render_not_found(&self) {
        self.stats.increment_not_found();
        self.surface.commit(markup::not_found_page());
    }

    /// Moves the router onto its own task, handling `events` until a
    /// shutdown event arrives or the queue closes.
    pub fn spawn(self, events: AsyncReceiver<NavigationEvent>) -> JoinHandle<()> {
        self.spawn_on(events, &Handle::current())
    }

    /// Like [`spawn`](Self::spawn), but on `runtime`, so it works from a
    /// thread outside the runtime.
    pub fn spawn_on(
        self,
        events: AsyncReceiver<NavigationEvent>,
        runtime: &Handle,
    ) -> JoinHandle<()> {
        runtime.spawn(async move { self.run_loop(events).await })
    }

    async fn run_loop(&self, events: AsyncReceiver<NavigationEvent>) {
        info!("Router run_loop started with {} routes", self.routes.len());
        loop {
            match events.recv().await {
                Ok(NavigationEvent::Load { hash }) => {
                    trace!("Initial load at {:?}", hash);
                    self.handle_route_change(&path_of(&hash)).await;
                }
                Ok(NavigationEvent::HashChange { from, to }) => {
                    trace!("Fragment changed from {:?} to {:?}", from, to);
                    self.handle_route_change(&path_of(&to)).await;
                }
                Ok(NavigationEvent::Shutdown) => {
                    info!("Router received shutdown signal. Exiting run_loop.");
                    break;
                }
                Err(_) => {
                    warn!("Navigation channel closed. Exiting run_loop.");
                    break;
                }
            }
        }
        info!(
            "Router run_loop finished after {} transitions.",
            self.state.transitions()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemorySurface;
    use parking_lot::Mutex;

    type Calls = Arc<Mutex<Vec<String>>>;

    fn recorder(calls: &Calls, label: &'static str) -> impl RouteHandler {
        let calls = Arc::clone(calls);
        move |params: RouteParams| {
            let calls = Arc::clone(&calls);
            async move {
                let id = params.get("id").unwrap_or("-").to_string();
                calls.lock().push(format!("{}:{}", label, id));
                anyhow::Ok(())
            }
        }
    }

    fn router() -> (Router, AsyncReceiver<NavigationEvent>, Arc<MemorySurface>) {
        let (location, rx) = Location::new();
        let surface = Arc::new(MemorySurface::new());
        (Router::new(location, surface.clone()), rx, surface)
    }

    #[tokio::test]
    async fn first_registered_route_wins() {
        let calls: Calls = Arc::default();
        let (router, _rx, _surface) = router();
        let router = router
            .route("/anime/:id", recorder(&calls, "details"))
            .route("/anime/:slug", recorder(&calls, "shadowed"));

        router.handle_route_change("/anime/42").await;

        assert_eq!(*calls.lock(), vec!["details:42".to_string()]);
        assert_eq!(router.state().matched_route().as_deref(), Some("/anime/42"));
        assert_eq!(router.stats().route_hits_for("/anime/:id"), 1);
    }

    #[tokio::test]
    async fn re_registering_replaces_in_place() {
        let calls: Calls = Arc::default();
        let (router, _rx, _surface) = router();
        let router = router
            .route("/anime/:id", recorder(&calls, "old"))
            .route("/anime/:slug", recorder(&calls, "second"))
            .route("/anime/:id", recorder(&calls, "new"));

        assert_eq!(router.routes().len(), 2);
        router.handle_route_change("/anime/7").await;
        assert_eq!(*calls.lock(), vec!["new:7".to_string()]);
    }

    #[tokio::test]
    async fn unmatched_path_renders_not_found() {
        let (router, _rx, surface) = router();
        let router = router.route("/", |_params: RouteParams| async { anyhow::Ok(()) });

        router.handle_route_change("/nonexistent").await;

        assert!(surface.content().contains("404"));
        assert!(surface.content().contains("href=\"#/\""));
        assert_eq!(router.state().matched_route(), None);
        assert!(router.state().is_idle());
    }

    #[tokio::test]
    async fn failing_and_panicking_handlers_fall_back_to_not_found() {
        let (router, _rx, surface) = router();
        let router = router
            .route("/fails", |_params: RouteParams| async {
                Err::<(), _>(anyhow::anyhow!("backend exploded"))
            })
            .route("/panics", |_params: RouteParams| async {
                if true {
                    panic!("handler bug");
                }
                anyhow::Ok(())
            });

        router.handle_route_change("/fails").await;
        assert!(surface.content().contains("404"));

        surface.commit(String::new());
        router.handle_route_change("/panics").await;
        assert!(surface.content().contains("404"));

        let stats = router.stats();
        assert_eq!(stats.handler_faults.load(std::sync::atomic::Ordering::SeqCst), 2);
        assert!(router.state().is_idle());
    }

    #[tokio::test]
    async fn loop_handles_events_in_order_until_shutdown() {
        let calls: Calls = Arc::default();
        let (location, rx) = Location::with_hash("#/anime/1");
        let surface = Arc::new(MemorySurface::new());
        let router = Router::new(location.clone(), surface)
            .route("/", recorder(&calls, "home"))
            .route("/anime/:id", recorder(&calls, "details"));
        let state = router.state();

        location.load();
        location.navigate("/anime/2");
        location.navigate("/");
        // Same fragment again: no event.
        location.navigate("/");
        location.shutdown();

        router.spawn(rx).await.unwrap();

        assert_eq!(
            *calls.lock(),
            vec![
                "details:1".to_string(),
                "details:2".to_string(),
                "home:-".to_string()
            ]
        );
        assert_eq!(state.transitions(), 3);
        assert_eq!(state.current_path(), "/");
    }
}
