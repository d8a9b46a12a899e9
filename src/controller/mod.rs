//! # Controller Module
//!
//! The page controller: route handlers for the three views and the search
//! field's debounce and cancellation logic.
//!
//! ## Overview
//!
//! Every handler follows the same three phases. It renders a loading
//! placeholder, performs its backend calls, and then renders either the final
//! view or an inline error view plus an error notification. A search that was
//! superseded while it ran renders nothing at all.
//!
//! Typing into the search field never searches directly. Each keystroke
//! restarts a debounce timer; when the timer fires the controller navigates
//! to `/search/<query>` and the router invokes the search handler like any
//! other navigation.

mod pages;
mod search;

use crate::api::ApiClient;
use crate::builder::AppConfig;
use crate::render::Surface;
use crate::router::{Location, RouteParams, Router};
use crate::stats::NavigationStats;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, trace};

pub(crate) use search::SearchSession;

/// Pattern of the home view.
pub const HOME_ROUTE: &str = "/";
/// Pattern of the details view.
pub const DETAILS_ROUTE: &str = "/anime/:id";
/// Pattern of the search results view.
pub const SEARCH_ROUTE: &str = "/search/:query";

const SEARCH_PREFIX: &str = "/search/";

/// Renders pages and coordinates searches.
pub struct PageController {
    api: Arc<dyn ApiClient>,
    surface: Arc<dyn Surface>,
    location: Location,
    config: AppConfig,
    search: Mutex<SearchSession>,
    stats: Arc<NavigationStats>,
    runtime: Handle,
}

impl PageController {
    /// Creates the controller. Debounce timers are spawned on `runtime`, so
    /// the search entry points can be called from outside the runtime.
    ///
    /// The controller also watches `location`: moving to any path outside
    /// `/search/` clears the search session.
    pub fn new(
        api: Arc<dyn ApiClient>,
        surface: Arc<dyn Surface>,
        location: Location,
        config: AppConfig,
        stats: Arc<NavigationStats>,
        runtime: Handle,
    ) -> Arc<Self> {
        let controller = Arc::new(Self {
            api,
            surface,
            location,
            config,
            search: Mutex::new(SearchSession::default()),
            stats,
            runtime,
        });

        let watcher = Arc::downgrade(&controller);
        controller.location.on_change(move |path| {
            if let Some(controller) = watcher.upgrade() {
                controller.path_changed(path);
            }
        });
        controller
    }

    fn path_changed(&self, path: &str) {
        if !path.starts_with(SEARCH_PREFIX) {
            trace!("Left search for {}, clearing the search session", path);
            self.interrupt_search();
        }
    }

    /// Registers the home, details and search handlers on `router`.
    pub fn register_routes(self: &Arc<Self>, router: Router) -> Router {
        let home = Arc::clone(self);
        let details = Arc::clone(self);
        let search = Arc::clone(self);

        router
            .route(HOME_ROUTE, move |_params: RouteParams| {
                let controller = Arc::clone(&home);
                async move { controller.render_home().await }
            })
            .route(DETAILS_ROUTE, move |params: RouteParams| {
                let controller = Arc::clone(&details);
                async move { controller.render_details(params).await }
            })
            .route(SEARCH_ROUTE, move |params: RouteParams| {
                let controller = Arc::clone(&search);
                async move { controller.render_search(params).await }
            })
    }

    /// Reacts to the search field changing to `value`.
    ///
    /// Any pending timer is cleared and every issued search is cancelled. An
    /// empty value leaves the search view for home; anything else arms the
    /// debounce timer.
    pub fn input_changed(self: &Arc<Self>, value: &str) {
        let query = value.trim().to_string();
        let mut session = self.search.lock();
        session.interrupt();

        if query.is_empty() {
            drop(session);
            if self.location.current_path().starts_with(SEARCH_PREFIX) {
                debug!("Search field cleared, returning home");
                self.location.navigate(HOME_ROUTE);
            }
            return;
        }

        let generation = session.next_generation();
        let controller = Arc::clone(self);
        let delay = self.config.debounce_delay;
        trace!("Arming search timer for {:?} ({:?})", query, delay);
        let timer = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if controller.search.lock().disarm(generation) {
                controller.perform_search(&query);
            }
        });
        session.arm(generation, timer);
    }

    /// Searches for `value` right away, as when Enter is pressed.
    pub fn submit_search(&self, value: &str) {
        let query = value.trim();
        if query.is_empty() {
            return;
        }
        self.search.lock().interrupt();
        self.perform_search(query);
    }

    /// Issues a search for `query` by navigating to its results view.
    pub fn perform_search(&self, query: &str) {
        let path = format!("{}{}", SEARCH_PREFIX, urlencoding::encode(query));
        self.search.lock().issue(query);
        self.stats.increment_searches_issued();
        debug!("Issuing search for {:?}", query);

        if self.location.current_path() == path {
            self.location.refresh();
        } else {
            self.location.navigate(&path);
        }
    }

    /// Drops the armed timer and cancels every issued search.
    pub(crate) fn interrupt_search(&self) {
        self.search.lock().interrupt();
    }

    /// `true` while a debounce timer is armed.
    pub fn has_pending_search(&self) -> bool {
        self.search.lock().has_timer()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub(crate) fn runtime(&self) -> &Handle {
        &self.runtime
    }
}
