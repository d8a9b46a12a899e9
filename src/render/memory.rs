//! In-memory [`Surface`] for headless use.

use super::{NoticeKind, Surface};
use parking_lot::Mutex;
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct SurfaceState {
    content: String,
    commits: Vec<String>,
    loading: bool,
    loading_shown: usize,
    notices: Vec<(String, NoticeKind)>,
    search_input: String,
    title: String,
}

/// A display that records everything rendered into it.
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<SurfaceState>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The markup currently on display.
    pub fn content(&self) -> String {
        self.state.lock().content.clone()
    }

    /// Every markup string committed so far, oldest first.
    pub fn commits(&self) -> Vec<String> {
        self.state.lock().commits.clone()
    }

    /// Whether the blocking overlay is currently visible.
    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// How many times the overlay has been shown.
    pub fn loading_shown(&self) -> usize {
        self.state.lock().loading_shown
    }

    /// Notifications shown so far, oldest first.
    pub fn notices(&self) -> Vec<(String, NoticeKind)> {
        self.state.lock().notices.clone()
    }

    /// The current document title.
    pub fn title(&self) -> String {
        self.state.lock().title.clone()
    }
}

impl Surface for MemorySurface {
    fn commit(&self, markup: String) {
        let mut state = self.state.lock();
        trace!("Committing {} bytes of markup", markup.len());
        state.commits.push(markup.clone());
        state.content = markup;
    }

    fn show_loading(&self) {
        let mut state = self.state.lock();
        state.loading = true;
        state.loading_shown += 1;
    }

    fn hide_loading(&self) {
        self.state.lock().loading = false;
    }

    fn notify(&self, message: &str, kind: NoticeKind) {
        debug!("Notification ({:?}): {}", kind, message);
        self.state.lock().notices.push((message.to_string(), kind));
    }

    fn search_input(&self) -> String {
        self.state.lock().search_input.clone()
    }

    fn set_search_input(&self, value: &str) {
        self.state.lock().search_input = value.to_string();
    }

    fn set_title(&self, title: &str) {
        self.state.lock().title = title.to_string();
    }
}
