//! Module for tracking the router's navigation state.
//!
//! `NavigationState` records where the application currently is: the path
//! derived from the fragment, the path of the last route that matched, and
//! whether a route handler is running right now. Only the router writes to
//! it; everything else reads. The "in transition" flag is what lets
//! [`App::wait_idle`](crate::App::wait_idle) tell when navigation has settled.

use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Represents the shared navigation state of the router.
#[derive(Debug, Default)]
pub struct NavigationState {
    current_path: RwLock<String>,
    matched_route: RwLock<Option<String>>,
    in_transition: AtomicBool,
    transitions: AtomicUsize,
}

impl NavigationState {
    /// Creates a new, atomically reference-counted `NavigationState`.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The path handled by the most recent navigation event.
    pub fn current_path(&self) -> String {
        self.current_path.read().clone()
    }

    /// The path of the last navigation that matched a route.
    pub fn matched_route(&self) -> Option<String> {
        self.matched_route.read().clone()
    }

    /// Number of navigation events handled so far.
    pub fn transitions(&self) -> usize {
        self.transitions.load(Ordering::SeqCst)
    }

    /// Checks if no navigation is being handled.
    pub fn is_idle(&self) -> bool {
        !self.in_transition.load(Ordering::SeqCst)
    }

    pub(crate) fn begin(&self, path: &str) {
        self.in_transition.store(true, Ordering::SeqCst);
        *self.current_path.write() = path.to_string();
    }

    pub(crate) fn matched(&self, path: &str) {
        *self.matched_route.write() = Some(path.to_string());
    }

    pub(crate) fn finish(&self) {
        self.transitions.fetch_add(1, Ordering::SeqCst);
        self.in_transition.store(false, Ordering::SeqCst);
    }
}
