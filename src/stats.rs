//! # Statistics Module
//!
//! Collects counters about navigation and search activity.
//!
//! ## Overview
//!
//! `NavigationStats` is shared by the router and the page controller. The
//! router counts handled navigations, not-found renders, handler faults and
//! per-route hits; the controller counts issued and cancelled searches and
//! upstream failures. The collector can be rendered as a short text summary
//! or exported as JSON.
//!
//! ## Example
//!
//! ```rust,ignore
//! let stats = app.stats();
//! println!("{}", stats);
//! println!("{}", stats.to_json_string_pretty()?);
//! ```

use crate::error::AppError;
use dashmap::DashMap;
use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};

// A consistent copy of the counters, used by the Display impl.
struct StatsSnapshot {
    navigations: usize,
    not_found: usize,
    handler_faults: usize,
    searches_issued: usize,
    searches_cancelled: usize,
    upstream_failures: usize,
    route_hits: BTreeMap<String, usize>,
    elapsed_duration: Duration,
}

impl StatsSnapshot {
    fn formatted_duration(&self) -> String {
        format!("{:?}", self.elapsed_duration)
    }
}

/// Collects navigation and search statistics.
#[derive(Debug, serde::Serialize)]
pub struct NavigationStats {
    #[serde(skip)]
    pub start_time: Instant,

    pub navigations: AtomicUsize,
    pub not_found: AtomicUsize,
    pub handler_faults: AtomicUsize,

    pub searches_issued: AtomicUsize,
    pub searches_cancelled: AtomicUsize,
    pub upstream_failures: AtomicUsize,

    // Keyed by route pattern, e.g. "/anime/:id".
    pub route_hits: DashMap<String, usize>,
}

impl NavigationStats {
    /// Creates a new `NavigationStats` with all counters at zero.
    pub fn new() -> Self {
        NavigationStats {
            start_time: Instant::now(),
            navigations: AtomicUsize::new(0),
            not_found: AtomicUsize::new(0),
            handler_faults: AtomicUsize::new(0),
            searches_issued: AtomicUsize::new(0),
            searches_cancelled: AtomicUsize::new(0),
            upstream_failures: AtomicUsize::new(0),
            route_hits: DashMap::new(),
        }
    }

    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            navigations: self.navigations.load(Ordering::SeqCst),
            not_found: self.not_found.load(Ordering::SeqCst),
            handler_faults: self.handler_faults.load(Ordering::SeqCst),
            searches_issued: self.searches_issued.load(Ordering::SeqCst),
            searches_cancelled: self.searches_cancelled.load(Ordering::SeqCst),
            upstream_failures: self.upstream_failures.load(Ordering::SeqCst),
            route_hits: self
                .route_hits
                .iter()
                .map(|entry| (entry.key().clone(), *entry.value()))
                .collect(),
            elapsed_duration: self.start_time.elapsed(),
        }
    }

    pub(crate) fn increment_navigations(&self) {
        self.navigations.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_handler_faults(&self) {
        self.handler_faults.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_searches_issued(&self) {
        self.searches_issued.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_searches_cancelled(&self) {
        self.searches_cancelled.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_upstream_failures(&self) {
        self.upstream_failures.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_route_hit(&self, pattern: &str) {
        *self.route_hits.entry(pattern.to_string()).or_insert(0) += 1;
    }

    /// Hits recorded for `pattern`.
    pub fn route_hits_for(&self, pattern: &str) -> usize {
        self.route_hits.get(pattern).map(|hits| *hits).unwrap_or(0)
    }

    /// Converts the counters into a JSON string.
    pub fn to_json_string(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Converts the counters into a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for NavigationStats {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NavigationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();

        writeln!(f, "\nNavigation Statistics")?;
        writeln!(f, "---------------------")?;
        writeln!(f, "  uptime     : {}", snapshot.formatted_duration())?;
        writeln!(
            f,
            "  navigation : handled: {}, not found: {}, faults: {}",
            snapshot.navigations, snapshot.not_found, snapshot.handler_faults
        )?;
        writeln!(
            f,
            "  search     : issued: {}, cancelled: {}",
            snapshot.searches_issued, snapshot.searches_cancelled
        )?;
        writeln!(f, "  upstream   : failures: {}", snapshot.upstream_failures)?;

        let routes = if snapshot.route_hits.is_empty() {
            "none".to_string()
        } else {
            snapshot
                .route_hits
                .iter()
                .map(|(pattern, hits)| format!("{}: {}", pattern, hits))
                .collect::<Vec<String>>()
                .join(", ")
        };

        writeln!(f, "  routes     : {}\n", routes)
    }
}
