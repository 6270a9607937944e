//! Status line with transient messages

/// Text shown once tracking runs and after every transient message
pub const TRACKING_ACTIVE: &str = "Tracking active";

/// A status line that can flash a message and fall back later.
///
/// Only one revert is pending at a time; a newer message replaces it.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    text: String,
    revert_at_ms: Option<u64>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new("Ready")
    }
}

impl StatusBoard {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            revert_at_ms: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Show `text` until something else replaces it
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.revert_at_ms = None;
    }

    /// Show `text` for `duration_ms`, then revert to [`TRACKING_ACTIVE`]
    pub fn flash(&mut self, text: impl Into<String>, now_ms: u64, duration_ms: u64) {
        self.text = text.into();
        self.revert_at_ms = Some(now_ms + duration_ms);
    }

    pub fn tick(&mut self, now_ms: u64) {
        if self.revert_at_ms.is_some_and(|at| now_ms >= at) {
            self.set(TRACKING_ACTIVE);
        }
    }
}
