//! PromptDock - the widget handle exposed to JavaScript.

use wasm_bindgen::prelude::*;

use promptdock_browser::{OverlayWidget, TOGGLE_EVENT};

/// The overlay widget instance exposed to JavaScript.
///
/// One per page; [`mount`](PromptDock::mount) enforces that.
#[wasm_bindgen]
pub struct PromptDock {
    widget: OverlayWidget,
}

#[wasm_bindgen]
impl PromptDock {
    /// Mount the widget into the current page and start loading the
    /// decorator list.
    ///
    /// Refuses inside sub-frames and when a widget is already mounted, so a
    /// content script injected into every frame still ends up with exactly
    /// one widget per tab.
    #[wasm_bindgen]
    pub fn mount() -> Result<PromptDock, JsError> {
        if !is_top_frame() {
            return Err(JsError::new("promptdock only mounts in the top frame"));
        }
        let widget = OverlayWidget::mount().map_err(|e| JsError::new(&e.to_string()))?;
        widget.refresh_decorators();
        Ok(PromptDock { widget })
    }

    /// Flip widget visibility, persisting the choice for this hostname.
    ///
    /// Equivalent to dispatching the toggle event on `window`.
    #[wasm_bindgen]
    pub fn toggle(&self) {
        self.widget.toggle();
    }

    /// Whether the control is currently shown.
    #[wasm_bindgen(js_name = isVisible)]
    pub fn is_visible(&self) -> bool {
        self.widget.is_visible()
    }

    /// Name of the window event that also toggles visibility, for callers
    /// that hold no handle.
    #[wasm_bindgen(js_name = toggleEventName)]
    pub fn toggle_event_name() -> String {
        TOGGLE_EVENT.to_string()
    }

    /// Remove the widget and all its listeners from the page.
    #[wasm_bindgen]
    pub fn unmount(self) {
        self.widget.unmount();
    }
}

fn is_top_frame() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    match window.top() {
        Ok(Some(top)) => top == window,
        _ => true,
    }
}
