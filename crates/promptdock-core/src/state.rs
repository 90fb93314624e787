//! Widget orchestration state: the persisted config plus the transient
//! popover flag.
//!
//! The one invariant: the popover can only be open while the control is
//! visible. Every path that clears visibility also closes the popover.

use crate::config::WidgetConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetState {
    config: WidgetConfig,
    panel_open: bool,
}

impl WidgetState {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            panel_open: false,
        }
    }

    pub fn config(&self) -> WidgetConfig {
        self.config
    }

    pub fn is_visible(&self) -> bool {
        self.config.visible
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Record the control's position (after a dock or resize re-snap).
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.config.set_position(x, y);
    }

    /// Show or hide the control. Hiding also closes the popover.
    pub fn set_visible(&mut self, visible: bool) {
        self.config.visible = visible;
        if !visible {
            self.panel_open = false;
        }
    }

    /// Flip visibility, returning the new value.
    pub fn toggle_visible(&mut self) -> bool {
        self.set_visible(!self.config.visible);
        self.config.visible
    }

    /// Open or close the popover. Refused while hidden.
    pub fn toggle_panel(&mut self) -> bool {
        if self.config.visible {
            self.panel_open = !self.panel_open;
        }
        self.panel_open
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }
}
