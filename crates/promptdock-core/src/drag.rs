//! Click/drag discrimination for the floating control.
//!
//! A press starts a pending gesture. It becomes a drag once the pointer
//! travels more than [`DRAG_THRESHOLD`] on either axis; released without
//! crossing the threshold it resolves as a click when shorter than
//! [`CLICK_WINDOW`]. Dragging ends in a dock request. The machine is pure:
//! the browser layer feeds it pointer events and applies the positions it
//! returns.

use std::time::Duration;

use web_time::Instant;

use crate::geometry::Point;

/// Pointer travel (px, on either axis) beyond which a press becomes a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Maximum press duration still treated as a click.
pub const CLICK_WINDOW: Duration = Duration::from_millis(200);

/// One press-to-release gesture on the control.
#[derive(Clone, Copy, Debug)]
pub struct DragSession {
    /// Pointer position at press.
    pub start: Point,
    /// The control's top-left corner at press.
    pub origin: Point,
    /// When the press happened.
    pub pressed_at: Instant,
}

/// How a gesture resolved at release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEnd {
    /// Short press without movement: toggle the popover.
    Click,
    /// The control was dragged: snap it to the nearer edge.
    Dock,
    /// Long motionless press, or no gesture was live.
    Ignored,
}

#[derive(Clone, Copy, Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Pending(DragSession),
    Dragging(DragSession),
}

/// The pointer state machine: `Idle -> Pending -> Dragging -> Idle`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DragMachine {
    phase: Phase,
}

impl DragMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a gesture. `pointer` is the press position, `origin` the
    /// control's current top-left corner.
    pub fn pointer_down(&mut self, pointer: Point, origin: Point, now: Instant) {
        self.phase = Phase::Pending(DragSession {
            start: pointer,
            origin,
            pressed_at: now,
        });
    }

    /// Feed a pointer move. Returns the control position to apply, or `None`
    /// while the gesture is still within the click threshold (or no gesture
    /// is live).
    pub fn pointer_move(&mut self, pointer: Point) -> Option<Point> {
        let session = match self.phase {
            Phase::Idle => return None,
            Phase::Pending(s) | Phase::Dragging(s) => s,
        };
        let dx = pointer.x - session.start.x;
        let dy = pointer.y - session.start.y;
        if matches!(self.phase, Phase::Pending(_)) {
            if dx.abs() <= DRAG_THRESHOLD && dy.abs() <= DRAG_THRESHOLD {
                return None;
            }
            self.phase = Phase::Dragging(session);
        }
        Some(Point::new(session.origin.x + dx, session.origin.y + dy))
    }

    /// End the gesture and return how it resolved. The machine goes back to
    /// idle either way.
    pub fn pointer_up(&mut self, now: Instant) -> DragEnd {
        let end = match self.phase {
            Phase::Idle => DragEnd::Ignored,
            Phase::Dragging(_) => DragEnd::Dock,
            Phase::Pending(session) => {
                if now.duration_since(session.pressed_at) < CLICK_WINDOW {
                    DragEnd::Click
                } else {
                    DragEnd::Ignored
                }
            }
        };
        self.phase = Phase::Idle;
        end
    }

    /// Whether the pointer has crossed the drag threshold.
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    /// Whether a gesture is live (pressed, dragging or not).
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }
}
