//! # Render Module
//!
//! The display side of the application.
//!
//! [`markup`] holds the pure functions that turn records into HTML fragments.
//! [`Surface`] is the imperative half: the one mutable display target, which
//! receives committed markup, toggles the blocking overlay, shows transient
//! notifications and exposes the search field. [`MemorySurface`] keeps all of
//! that in memory for headless runs and tests.

pub mod markup;
mod memory;

pub use memory::MemorySurface;

/// Severity of a transient notification. Only failures are announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    Error,
}

/// The display the page controller and router render into.
pub trait Surface: Send + Sync + 'static {
    /// Replaces the main content with `markup`.
    fn commit(&self, markup: String);

    /// Shows the blocking loading overlay.
    fn show_loading(&self);

    /// Hides the blocking loading overlay.
    fn hide_loading(&self);

    /// Shows a transient notification.
    fn notify(&self, message: &str, kind: NoticeKind);

    /// Current value of the search field.
    fn search_input(&self) -> String;

    /// Overwrites the search field.
    fn set_search_input(&self, value: &str);

    /// Sets the document title.
    fn set_title(&self, title: &str);
}

/// Keeps the loading overlay up for as long as it is alive.
pub(crate) struct LoadingOverlay<'a> {
    surface: &'a dyn Surface,
}

impl<'a> LoadingOverlay<'a> {
    pub(crate) fn show(surface: &'a dyn Surface) -> Self {
        surface.show_loading();
        Self { surface }
    }
}

impl Drop for LoadingOverlay<'_> {
    fn drop(&mut self) {
        self.surface.hide_loading();
    }
}
