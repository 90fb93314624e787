//! Overlay geometry: viewport model, default placement, edge docking, and
//! popover panel positioning.
//!
//! All coordinates are CSS pixels in viewport space. The functions here are
//! pure; the browser layer measures elements and applies the results.

/// A position in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a rendered element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An element's bounding box in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Horizontal midpoint.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Viewport dimensions plus the width taken by a classic (non-overlay)
/// vertical scrollbar. Zero when the page does not scroll or the platform
/// draws overlay scrollbars.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scrollbar: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, scrollbar: f64) -> Self {
        Self {
            width,
            height,
            scrollbar,
        }
    }
}

/// Gap kept between a docked control and the viewport edge.
pub const EDGE_MARGIN: f64 = 10.0;

/// Horizontal inset of the initial, never-dragged placement.
const DEFAULT_INSET: f64 = 20.0;

/// Vertical offset of the initial placement.
const DEFAULT_TOP: f64 = 80.0;

/// Gap between the control and its popover panel.
const PANEL_GAP: f64 = 12.0;

/// Minimum distance kept between the panel and the top/bottom viewport edges.
const PANEL_MARGIN: f64 = 20.0;

/// Initial placement for a control that has never been positioned: near the
/// top-right corner, clear of any vertical scrollbar.
pub fn default_position(control: Size, viewport: Viewport) -> Point {
    Point::new(
        viewport.width - control.width - DEFAULT_INSET - viewport.scrollbar,
        DEFAULT_TOP,
    )
}

/// Snap target after a drag: the vertical edge nearer to the control's
/// center, with the vertical coordinate clamped fully on-screen.
pub fn dock_position(control: Rect, viewport: Viewport) -> Point {
    let x = if control.center_x() < viewport.width / 2.0 {
        EDGE_MARGIN
    } else {
        viewport.width - control.width - EDGE_MARGIN - viewport.scrollbar
    };
    let max_y = (viewport.height - control.height - EDGE_MARGIN).max(EDGE_MARGIN);
    let y = control.y.clamp(EDGE_MARGIN, max_y);
    Point::new(x, y)
}

/// Panel placement at popover open: the side of the control away from the
/// nearer viewport edge, top-aligned with the control and clamped so the
/// panel stays on-screen vertically.
pub fn panel_position(control: Rect, panel: Size, viewport: Viewport) -> Point {
    let x = if control.x > viewport.width / 2.0 {
        control.x - panel.width - PANEL_GAP
    } else {
        control.right() + PANEL_GAP
    };
    let max_y = (viewport.height - panel.height - PANEL_MARGIN).max(PANEL_MARGIN);
    let y = control.y.clamp(PANEL_MARGIN, max_y);
    Point::new(x, y)
}
