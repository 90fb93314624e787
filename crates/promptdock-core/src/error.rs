//! Widget error taxonomy.
//!
//! Every variant is recovered inside the widget: surfaced as a transient
//! toast or substituted with a fallback. Nothing here may unwind into
//! host-page scripts.

use thiserror::Error;

use crate::surface::InsertUnsupported;

/// Errors raised by widget operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WidgetError {
    /// No text-entry surface could be located on the page.
    #[error("no text input surface found on this page")]
    NoSurfaceFound,

    /// The surface already contains the requested command. A guard, not a
    /// fault: insertion is skipped and the user is told.
    #[error("content already contains this command")]
    DuplicateContent,

    /// The platform insert-text command is unavailable or was refused.
    #[error("insert command rejected by the platform")]
    InsertCommandUnsupported,

    /// Persisted configuration failed to deserialize.
    #[error("stored configuration is corrupt: {0}")]
    ConfigLoadCorrupt(String),

    /// The remote decorator source could not be retrieved.
    #[error("decorator source fetch failed: {0}")]
    SourceFetchFailed(String),
}

impl From<InsertUnsupported> for WidgetError {
    fn from(_: InsertUnsupported) -> Self {
        WidgetError::InsertCommandUnsupported
    }
}
