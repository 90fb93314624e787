//! The text-injection engine: bulk replacement and simulated typing.
//!
//! Bulk insertion replaces the surface content wholesale. Typed insertion
//! feeds one character per tick through the platform insert command so rich
//! editors observe each keystroke; the session is resumable (it holds a
//! cursor index) and cancellable by dropping it. Both paths finish with a
//! single notification batch.

use tracing::{debug, warn};

use crate::error::WidgetError;
use crate::surface::TextSurface;

/// Delay between typing ticks, in milliseconds.
pub const TYPING_INTERVAL_MS: u32 = 1;

/// Replace the surface content wholesale: focus, clear, platform insert
/// command with direct assignment as fallback, one notification batch.
pub fn insert_bulk<S: TextSurface + ?Sized>(surface: &S, text: &str) {
    surface.focus();
    surface.clear();
    if surface.insert_at_cursor(text).is_err() {
        debug!("insert command unavailable, assigning content directly");
        surface.append_raw(text);
    }
    surface.notify_changed();
}

/// What a typed insertion request amounts to, given the current content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertPlan {
    /// The command is already present; nothing to type.
    AlreadyPresent,
    /// Type this text (the command, newline-prefixed when the surface has
    /// non-whitespace content that does not already end in one).
    Type(String),
}

/// Decide what typing `command` into content `current` means.
pub fn plan_typed_insert(current: &str, command: &str) -> InsertPlan {
    if current.contains(command) {
        return InsertPlan::AlreadyPresent;
    }
    let text = if !current.trim().is_empty() && !current.ends_with('\n') {
        format!("\n{command}")
    } else {
        command.to_string()
    };
    InsertPlan::Type(text)
}

/// Start a typed insertion: duplicate guard, newline rule, focus, caret to
/// the end. Returns the session to drive, or [`WidgetError::DuplicateContent`]
/// with the surface untouched.
pub fn begin_typed_insert<S: TextSurface + ?Sized>(
    surface: &S,
    command: &str,
) -> Result<TypingSession, WidgetError> {
    let current = surface.read();
    match plan_typed_insert(&current, command) {
        InsertPlan::AlreadyPresent => Err(WidgetError::DuplicateContent),
        InsertPlan::Type(text) => {
            surface.focus();
            surface.move_caret_to_end();
            debug!(chars = text.chars().count(), "typed insertion started");
            Ok(TypingSession::new(&text))
        }
    }
}

/// Result of one typing tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A character went in; keep ticking.
    Typed,
    /// All characters are in and the notification batch has fired.
    Finished,
    /// The platform refused the insert command; the untyped remainder was
    /// appended directly and the notification batch has fired.
    Unsupported,
}

/// An in-flight typed insertion with a resumable cursor index.
///
/// The driver calls [`TypingSession::tick`] once per interval until it
/// answers something other than [`TickOutcome::Typed`]. Note the batch
/// notification fires on the tick *after* the last character, so a session
/// over `n` characters takes `n + 1` ticks.
#[derive(Clone, Debug)]
pub struct TypingSession {
    chars: Vec<char>,
    index: usize,
}

impl TypingSession {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
        }
    }

    /// Characters not yet typed.
    pub fn remaining(&self) -> usize {
        self.chars.len() - self.index
    }

    /// Insert the next character through the surface.
    pub fn tick<S: TextSurface + ?Sized>(&mut self, surface: &S) -> TickOutcome {
        let Some(&ch) = self.chars.get(self.index) else {
            surface.notify_changed();
            return TickOutcome::Finished;
        };

        let inserted = if ch == '\n' {
            surface.insert_line_break()
        } else {
            let mut buf = [0u8; 4];
            surface.insert_at_cursor(ch.encode_utf8(&mut buf))
        };

        match inserted {
            Ok(()) => {
                self.index += 1;
                surface.scroll_to_caret();
                TickOutcome::Typed
            }
            Err(refused) => {
                let remainder: String = self.chars[self.index..].iter().collect();
                let err = WidgetError::from(refused);
                warn!(
                    %err,
                    remaining = self.remaining(),
                    "typed insertion degraded to direct append"
                );
                self.index = self.chars.len();
                surface.append_raw(&remainder);
                surface.notify_changed();
                TickOutcome::Unsupported
            }
        }
    }
}
