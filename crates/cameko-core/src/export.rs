//! Copy and post actions.

use crate::analytics::AnalyticsEvent;
use crate::error::CamekoError;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

/// Compose intent endpoint used when no override is configured.
pub const DEFAULT_COMPOSE_URL: &str = "https://x.com/intent/post";

/// What to do with the generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Put the text on the system clipboard.
    Copy,
    /// Open the compose intent in a browser.
    Post,
}

impl ExportKind {
    #[must_use]
    pub const fn analytics_event(self) -> AnalyticsEvent {
        match self {
            Self::Copy => AnalyticsEvent::Copy,
            Self::Post => AnalyticsEvent::Post,
        }
    }
}

/// Side-effecting collaborator for the export actions.
pub trait Exporter {
    /// Write `text` to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`CamekoError::Export`] when the clipboard is unavailable.
    fn copy_text(&self, text: &str) -> Result<(), CamekoError>;

    /// Open `url` in a new browsing context.
    ///
    /// # Errors
    ///
    /// Returns [`CamekoError::Export`] when no browser could be launched.
    fn open_url(&self, url: &str) -> Result<(), CamekoError>;
}

/// Build the compose URL carrying `text` as the `text` query parameter.
#[must_use]
pub fn compose_url(base: &str, text: &str) -> String {
    let encoded = utf8_percent_encode(text, NON_ALPHANUMERIC);
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}text={encoded}")
}
