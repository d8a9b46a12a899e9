//! The navigation mechanism the router listens to.
//!
//! [`Location`] plays the part of the address fragment: it holds the current
//! `#...` value and queues a [`NavigationEvent`] whenever that value changes.
//! Changes never invoke route handlers directly; the router picks the events
//! up from its own loop. A browser embedding would forward real fragment
//! changes through [`Location::set_hash`]; tests drive it in memory.

use kanal::{AsyncReceiver, AsyncSender, unbounded_async};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{trace, warn};

/// Prefix that starts every fragment.
pub const FRAGMENT_MARKER: char = '#';

/// A change the router should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// The application finished loading at `hash`.
    Load { hash: String },
    /// The fragment changed, or the current one should be handled again.
    HashChange { from: String, to: String },
    /// Stop the router loop.
    Shutdown,
}

type PathObserver = Arc<dyn Fn(&str) + Send + Sync>;

/// Shared handle to the current fragment and its change queue.
#[derive(Clone)]
pub struct Location {
    hash: Arc<RwLock<String>>,
    tx: AsyncSender<NavigationEvent>,
    observers: Arc<RwLock<Vec<PathObserver>>>,
}

impl std::fmt::Debug for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Location")
            .field("hash", &*self.hash.read())
            .field("queued", &self.tx.len())
            .field("observers", &self.observers.read().len())
            .finish()
    }
}

impl Location {
    /// Creates a location with an empty fragment, returning the receiving end
    /// of its event queue.
    pub fn new() -> (Self, AsyncReceiver<NavigationEvent>) {
        Self::with_hash("")
    }

    /// Creates a location starting at `hash` (a deep link such as `#/anime/42`).
    pub fn with_hash(hash: &str) -> (Self, AsyncReceiver<NavigationEvent>) {
        let (tx, rx) = unbounded_async();
        let location = Self {
            hash: Arc::new(RwLock::new(hash.to_string())),
            tx,
            observers: Arc::default(),
        };
        (location, rx)
    }

    /// The raw fragment, including the leading `#` when present.
    pub fn hash(&self) -> String {
        self.hash.read().clone()
    }

    /// The path portion of the fragment, or `/` if it is empty.
    pub fn current_path(&self) -> String {
        path_of(&self.hash.read())
    }

    /// Sets the fragment to `path`, adding the leading `#` if missing.
    pub fn navigate(&self, path: &str) {
        if path.starts_with(FRAGMENT_MARKER) {
            self.set_hash(path);
        } else {
            self.set_hash(&format!("{}{}", FRAGMENT_MARKER, path));
        }
    }

    /// Calls `observer` with the new path every time the fragment changes,
    /// as soon as it changes (before the router handles the event).
    pub fn on_change(&self, observer: impl Fn(&str) + Send + Sync + 'static) {
        self.observers.write().push(Arc::new(observer));
    }

    /// Replaces the fragment. Setting it to its current value queues nothing.
    pub fn set_hash(&self, hash: &str) {
        let from = {
            let mut current = self.hash.write();
            if *current == hash {
                trace!("Fragment already at {}, no navigation event", hash);
                return;
            }
            std::mem::replace(&mut *current, hash.to_string())
        };

        let observers = self.observers.read().clone();
        let path = path_of(hash);
        for observer in &observers {
            observer(&path);
        }

        self.emit(NavigationEvent::HashChange {
            from,
            to: hash.to_string(),
        });
    }

    /// Queues a change event for the current fragment without modifying it.
    pub fn refresh(&self) {
        let hash = self.hash();
        self.emit(NavigationEvent::HashChange {
            from: hash.clone(),
            to: hash,
        });
    }

    /// Queues the initial load event.
    pub fn load(&self) {
        self.emit(NavigationEvent::Load { hash: self.hash() });
    }

    /// Number of events waiting to be handled.
    pub fn queued(&self) -> usize {
        self.tx.len()
    }

    pub(crate) fn shutdown(&self) -> bool {
        self.emit(NavigationEvent::Shutdown)
    }

    fn emit(&self, event: NavigationEvent) -> bool {
        trace!("Queueing navigation event: {:?}", event);
        match self.tx.try_send(event) {
            Ok(true) => true,
            Ok(false) => {
                warn!("Navigation queue is full, event dropped.");
                false
            }
            Err(_) => {
                warn!("Navigation queue is closed, event dropped.");
                false
            }
        }
    }
}

/// The path portion of `hash`, or `/` if it is empty.
pub(crate) fn path_of(hash: &str) -> String {
    let path = hash.strip_prefix(FRAGMENT_MARKER).unwrap_or(hash);
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_path_defaults_to_root() {
        let (location, _rx) = Location::new();
        assert_eq!(location.current_path(), "/");

        let (location, _rx) = Location::with_hash("#");
        assert_eq!(location.current_path(), "/");

        let (location, _rx) = Location::with_hash("#/anime/42");
        assert_eq!(location.current_path(), "/anime/42");
    }

    #[test]
    fn navigate_normalizes_and_queues_changes() {
        let (location, rx) = Location::new();
        location.navigate("/search/naruto");
        assert_eq!(location.hash(), "#/search/naruto");

        location.navigate("#/");
        assert_eq!(location.current_path(), "/");
        assert_eq!(location.queued(), 2);

        let first = rx.try_recv().unwrap();
        assert_eq!(
            first,
            Some(NavigationEvent::HashChange {
                from: String::new(),
                to: "#/search/naruto".to_string(),
            })
        );
    }

    #[test]
    fn observers_see_every_change() {
        let (location, _rx) = Location::with_hash("#/");
        let seen = Arc::new(RwLock::new(Vec::new()));
        let sink = Arc::clone(&seen);
        location.on_change(move |path| sink.write().push(path.to_string()));

        location.navigate("/anime/1");
        location.navigate("/anime/1");
        location.set_hash("");
        location.refresh();

        assert_eq!(*seen.read(), vec!["/anime/1".to_string(), "/".to_string()]);
    }

    #[test]
    fn navigating_to_the_current_fragment_is_silent() {
        let (location, _rx) = Location::with_hash("#/");
        location.navigate("/");
        location.navigate("#/");
        assert_eq!(location.queued(), 0);

        location.refresh();
        assert_eq!(location.queued(), 1);
    }
}
