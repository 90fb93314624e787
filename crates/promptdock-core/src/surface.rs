//! Capability interface over host text-entry surfaces.
//!
//! The injection engine drives surfaces only through [`TextSurface`], so it
//! never branches on element kind: the plain/rich distinction lives in the
//! implementations. A rich editable overrides [`TextSurface::insert_line_break`]
//! to precede the newline with a synthetic key event; a plain field uses the
//! default, which treats the newline like any other fragment.

use thiserror::Error;

/// What kind of editing surface was located.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    /// `<textarea>` or a text-like `<input>`: value-backed.
    PlainField,
    /// A `contenteditable` host (ProseMirror and friends): DOM-backed.
    RichEditable,
}

/// The platform insert-text command is unavailable or was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("platform insert-text command unavailable")]
pub struct InsertUnsupported;

/// A text-entry surface the widget can inject into.
///
/// Methods take `&self`: DOM-backed implementations mutate through interior
/// handles, and the engine never needs exclusive access.
pub trait TextSurface {
    fn kind(&self) -> SurfaceKind;

    /// Give the surface input focus.
    fn focus(&self);

    /// Current textual content.
    fn read(&self) -> String;

    /// Remove all content.
    fn clear(&self);

    /// Insert `fragment` at the caret through the platform's insert-text
    /// command, so host frameworks observe the edit as if typed.
    fn insert_at_cursor(&self, fragment: &str) -> Result<(), InsertUnsupported>;

    /// Insert a newline at the caret.
    fn insert_line_break(&self) -> Result<(), InsertUnsupported> {
        self.insert_at_cursor("\n")
    }

    /// Append text by direct content assignment, bypassing the insert
    /// command. Fallback path only: frameworks will not see the change
    /// until [`TextSurface::notify_changed`] fires.
    fn append_raw(&self, text: &str);

    /// Move the caret past the last character.
    fn move_caret_to_end(&self);

    /// Keep the caret's line in view.
    fn scroll_to_caret(&self);

    /// Fire the synthetic `input`/`change`/`keyup` batch that makes host
    /// frameworks re-read the surface.
    fn notify_changed(&self);
}
