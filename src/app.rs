//! The assembled application.
//!
//! An [`App`] is produced by [`AppBuilder`](crate::AppBuilder). It owns the
//! router until [`start`](App::start) moves it onto its own task, and it is
//! the entry point for everything the outside world does to the page:
//! navigating, typing into the search field, pressing Enter.

use crate::builder::AppConfig;
use crate::controller::PageController;
use crate::error::AppError;
use crate::render::Surface;
use crate::router::{Location, NavigationEvent, Router};
use crate::state::NavigationState;
use crate::stats::NavigationStats;
use kanal::AsyncReceiver;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// The running (or ready to run) application.
pub struct App {
    pending: Mutex<Option<(Router, AsyncReceiver<NavigationEvent>)>>,
    router_task: Mutex<Option<JoinHandle<()>>>,
    location: Location,
    controller: Arc<PageController>,
    surface: Arc<dyn Surface>,
    config: AppConfig,
    state: Arc<NavigationState>,
    stats: Arc<NavigationStats>,
}

impl App {
    pub(crate) fn new(
        router: Router,
        events: AsyncReceiver<NavigationEvent>,
        location: Location,
        controller: Arc<PageController>,
        surface: Arc<dyn Surface>,
        config: AppConfig,
        stats: Arc<NavigationStats>,
    ) -> Self {
        let state = router.state();
        Self {
            pending: Mutex::new(Some((router, events))),
            router_task: Mutex::new(None),
            location,
            controller,
            surface,
            config,
            state,
            stats,
        }
    }

    /// Starts the router loop, sets the title and handles the initial fragment.
    pub fn start(&self) -> Result<(), AppError> {
        let (router, events) = self
            .pending
            .lock()
            .take()
            .ok_or_else(|| AppError::GeneralError("App already started".to_string()))?;

        *self.router_task.lock() = Some(router.spawn_on(events, self.controller.runtime()));
        self.surface.set_title(&self.config.title);
        info!("AnimeStream app initialized");
        self.location.load();
        Ok(())
    }

    /// Navigates to `path`. The view updates once the router gets to it.
    pub fn navigate(&self, path: &str) {
        self.location.navigate(path);
    }

    pub fn current_path(&self) -> String {
        self.location.current_path()
    }

    /// The search field changed to `value`.
    pub fn input_changed(&self, value: &str) {
        self.controller.input_changed(value);
    }

    /// Enter was pressed in the search field.
    pub fn submit_search(&self, value: &str) {
        self.controller.submit_search(value);
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> Arc<NavigationState> {
        Arc::clone(&self.state)
    }

    pub fn stats(&self) -> Arc<NavigationStats> {
        Arc::clone(&self.stats)
    }

    fn is_idle(&self) -> bool {
        self.location.queued() == 0 && self.state.is_idle() && !self.controller.has_pending_search()
    }

    /// Waits until no event is queued, no handler runs and no search timer is armed.
    pub async fn wait_idle(&self) {
        loop {
            if self.is_idle() {
                tokio::time::sleep(Duration::from_millis(10)).await;
                if self.is_idle() {
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        debug!("Application is idle");
    }

    /// Stops the router loop, waiting at most the configured shutdown timeout.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.controller.interrupt_search();

        let Some(mut task) = self.router_task.lock().take() else {
            debug!("Router was never started, nothing to shut down");
            return Ok(());
        };

        if !self.location.shutdown() {
            task.abort();
            return Err(AppError::ChannelClosed);
        }

        let timeout = self.config.shutdown_timeout;
        match tokio::time::timeout(timeout, &mut task).await {
            Ok(Ok(())) => {
                info!("Router stopped. {}", self.stats);
                Ok(())
            }
            Ok(Err(e)) => {
                error!("Router task failed during shutdown: {}", e);
                Err(AppError::GeneralError(e.to_string()))
            }
            Err(_) => {
                warn!(
                    "Router did not stop within {:?}, aborting its task.",
                    timeout
                );
                task.abort();
                Ok(())
            }
        }
    }
}
