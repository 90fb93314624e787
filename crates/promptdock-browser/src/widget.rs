//! The shadow-DOM overlay: floating control, decorator panel, and toast.
//!
//! Everything lives under a single host element so page CSS cannot leak in
//! and widget CSS cannot leak out. The control is dragged with the
//! document-level listener pair active only while a pointer is down, and
//! every gesture outcome funnels through the shared `DragMachine`.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo_timers::callback::Timeout;
use thiserror::Error;
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Event, EventTarget, HtmlElement, MouseEvent, Node, ShadowRootInit, ShadowRootMode,
    Window,
};

use promptdock_core::Instant;
use promptdock_core::config::{ConfigStore, storage_key};
use promptdock_core::decorators::{DEFAULT_SOURCE_URL, FALLBACK_SOURCE, parse_decorators};
use promptdock_core::drag::{DragEnd, DragMachine};
use promptdock_core::error::WidgetError;
use promptdock_core::geometry::{
    Point, Rect, Size, Viewport, default_position, dock_position, panel_position,
};
use promptdock_core::state::WidgetState;
use promptdock_core::typing::{begin_typed_insert, insert_bulk};

use crate::fetch::fetch_decorator_source;
use crate::inject::TypingTask;
use crate::locator::locate;
use crate::storage::LocalConfigStore;

/// Id of the widget's host element in the page's light DOM.
pub const HOST_ID: &str = "promptdock-host";

/// Window event that toggles widget visibility, for callers without a
/// direct [`OverlayWidget`] handle (an extension shell, a bookmarklet).
pub const TOGGLE_EVENT: &str = "promptdock:toggle";

/// On-screen size of the control; used as the measurement fallback when the
/// control is toggled visible while still `display: none`.
const CONTROL_SIZE_PX: f64 = 32.0;

const DOCK_TRANSITION: &str = "all 0.3s cubic-bezier(0.25, 0.8, 0.25, 1)";
const DOCK_TRANSITION_MS: u32 = 300;
const TOAST_MS: u32 = 2500;

/// Why [`OverlayWidget::mount`] refused.
#[derive(Debug, Clone, Error)]
pub enum MountError {
    /// The widget is a per-page singleton; a second mount is a caller bug.
    #[error("widget already mounted on this page")]
    AlreadyMounted,
    #[error("document unavailable: {0}")]
    Dom(String),
}

/// The floating decorator control for one page.
///
/// Owns the shadow-DOM overlay plus every listener and timer behind it.
/// [`unmount`](Self::unmount) tears that down; until then the overlay keeps
/// itself alive through the `Rc` handles its listeners hold.
pub struct OverlayWidget {
    inner: Rc<WidgetInner>,
}

struct WidgetInner {
    window: Window,
    document: Document,
    host: HtmlElement,
    button: HtmlElement,
    close_button: HtmlElement,
    panel: HtmlElement,
    panel_close: HtmlElement,
    panel_body: HtmlElement,
    toast: HtmlElement,
    storage_key: String,
    store: LocalConfigStore,
    state: RefCell<WidgetState>,
    machine: RefCell<DragMachine>,
    raw_source: RefCell<String>,
    typing: RefCell<Option<TypingTask>>,
    toast_timer: RefCell<Option<Timeout>>,
    transition_timer: RefCell<Option<Timeout>>,
    drag_listeners: RefCell<Option<[EventListener; 2]>>,
    entry_listeners: RefCell<Vec<EventListener>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl OverlayWidget {
    /// Mount the widget into the current page.
    ///
    /// Restores per-hostname position and visibility, builds the shadow DOM,
    /// and wires listeners. The panel shows a loading placeholder until
    /// [`refresh_decorators`](Self::refresh_decorators) fills it.
    pub fn mount() -> Result<Self, MountError> {
        let window = web_sys::window().ok_or_else(|| MountError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| MountError::Dom("no document".into()))?;

        if document.get_element_by_id(HOST_ID).is_some() {
            return Err(MountError::AlreadyMounted);
        }

        let hostname = window.location().hostname().unwrap_or_default();
        let key = storage_key(&hostname);
        let store = LocalConfigStore;
        // Partial or absent stored data merges over the host defaults, so a
        // blob without `visible` still follows the hostname rule.
        let config = store.load(&key).unwrap_or_default().into_config(&hostname);

        let dom = build_dom(&document)?;
        document
            .body()
            .ok_or_else(|| MountError::Dom("no body".into()))?
            .append_child(&dom.host)
            .map_err(js_err)?;

        let inner = Rc::new(WidgetInner {
            window,
            document,
            host: dom.host,
            button: dom.button,
            close_button: dom.close_button,
            panel: dom.panel,
            panel_close: dom.panel_close,
            panel_body: dom.panel_body,
            toast: dom.toast,
            storage_key: key,
            store,
            state: RefCell::new(WidgetState::new(config)),
            machine: RefCell::new(DragMachine::new()),
            raw_source: RefCell::new(String::new()),
            typing: RefCell::new(None),
            toast_timer: RefCell::new(None),
            transition_timer: RefCell::new(None),
            drag_listeners: RefCell::new(None),
            entry_listeners: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
        });

        inner.install_listeners();
        inner.apply_config_position();
        inner.apply_visibility();
        debug!(hostname = %hostname, "overlay widget mounted");

        Ok(Self { inner })
    }

    /// Download the decorator source and rebuild the panel, falling back to
    /// the bundled list when the fetch fails.
    pub fn refresh_decorators(&self) {
        let inner = Rc::clone(&self.inner);
        spawn_local(async move {
            let source = match fetch_decorator_source(DEFAULT_SOURCE_URL).await {
                Ok(text) => text,
                Err(err) => {
                    warn!(%err, "decorator source fetch failed, using bundled fallback");
                    FALLBACK_SOURCE.to_string()
                }
            };
            inner.render_entries(&source);
        });
    }

    /// Rebuild the panel from an already-fetched source document.
    pub fn render_entries(&self, source: &str) {
        self.inner.render_entries(source);
    }

    /// Flip widget visibility, persisting the change.
    pub fn toggle(&self) {
        self.inner.toggle_visibility();
    }

    /// Open or close the decorator panel, as a control click would.
    pub fn toggle_panel(&self) {
        self.inner.toggle_panel();
    }

    pub fn is_visible(&self) -> bool {
        self.inner.state.borrow().is_visible()
    }

    pub fn panel_open(&self) -> bool {
        self.inner.state.borrow().panel_open()
    }

    /// Remove the widget from the page and drop all listeners and timers.
    pub fn unmount(self) {
        self.inner.teardown();
        debug!("overlay widget unmounted");
    }
}

impl WidgetInner {
    fn install_listeners(self: &Rc<Self>) {
        let mut listeners = Vec::new();

        // Gesture entry point. preventDefault stops the page from starting
        // a text selection mid-drag, so this listener cannot be passive.
        let inner = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            &self.button,
            "mousedown",
            EventListenerOptions {
                phase: EventListenerPhase::Bubble,
                passive: false,
            },
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let close_target: &EventTarget = inner.close_button.as_ref();
                if event.target().as_ref() == Some(close_target) {
                    return;
                }
                event.prevent_default();
                let rect = inner.button_rect();
                inner.machine.borrow_mut().pointer_down(
                    Point::new(f64::from(event.client_x()), f64::from(event.client_y())),
                    Point::new(rect.x, rect.y),
                    Instant::now(),
                );
                inner.begin_drag_session();
            },
        ));

        let inner = Rc::clone(self);
        listeners.push(EventListener::new(
            &self.close_button,
            "click",
            move |event: &Event| {
                event.stop_propagation();
                inner.hide();
            },
        ));

        let inner = Rc::clone(self);
        listeners.push(EventListener::new(
            &self.panel_close,
            "click",
            move |_event: &Event| {
                inner.close_panel();
            },
        ));

        // A click anywhere outside the widget closes the panel. Clicks
        // inside the shadow tree retarget to the host, so contains() still
        // covers them.
        let inner = Rc::clone(self);
        listeners.push(EventListener::new(
            &self.document,
            "click",
            move |event: &Event| {
                if !inner.state.borrow().panel_open() {
                    return;
                }
                let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
                let inside = target
                    .map(|node| inner.host.contains(Some(&node)))
                    .unwrap_or(false);
                if !inside {
                    inner.close_panel();
                }
            },
        ));

        // Re-snap when the viewport changes shape. A hidden control
        // measures 0x0 and a mid-drag one is about to dock anyway, so both
        // are skipped; coordinates left stale this way are re-snapped the
        // next time they are applied.
        let inner = Rc::clone(self);
        listeners.push(EventListener::new(
            &self.window,
            "resize",
            move |_event: &Event| {
                let visible = inner.state.borrow().is_visible();
                let idle = !inner.machine.borrow().is_active();
                if visible && idle {
                    inner.dock();
                }
            },
        ));

        let inner = Rc::clone(self);
        listeners.push(EventListener::new(
            &self.window,
            TOGGLE_EVENT,
            move |_event: &Event| {
                inner.toggle_visibility();
            },
        ));

        *self.listeners.borrow_mut() = listeners;
    }

    // === Drag session ===

    fn begin_drag_session(self: &Rc<Self>) {
        let inner = Rc::clone(self);
        let on_move = EventListener::new(&self.document, "mousemove", move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let pointer = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
            let moved = inner.machine.borrow_mut().pointer_move(pointer);
            if let Some(position) = moved {
                inner.apply_control_position(position);
            }
        });

        let inner = Rc::clone(self);
        let on_up = EventListener::new(&self.document, "mouseup", move |_event: &Event| {
            inner.end_drag_session();
        });

        *self.drag_listeners.borrow_mut() = Some([on_move, on_up]);
    }

    fn end_drag_session(self: &Rc<Self>) {
        // This method runs inside the session's own mouseup listener, so
        // the pair is dropped on the next tick rather than mid-call.
        if let Some(pair) = self.drag_listeners.borrow_mut().take() {
            Timeout::new(0, move || drop(pair)).forget();
        }
        match self.machine.borrow_mut().pointer_up(Instant::now()) {
            DragEnd::Click => self.toggle_panel(),
            DragEnd::Dock => self.dock(),
            DragEnd::Ignored => {}
        }
    }

    /// Animate the control to the nearer viewport edge and persist the spot.
    fn dock(&self) {
        let target = dock_position(self.button_rect(), self.viewport());
        let _ = self.button.style().set_property("transition", DOCK_TRANSITION);
        self.apply_control_position(target);
        {
            let mut state = self.state.borrow_mut();
            state.set_position(target.x.round() as i32, target.y.round() as i32);
        }
        self.persist();

        let button = self.button.clone();
        *self.transition_timer.borrow_mut() = Some(Timeout::new(DOCK_TRANSITION_MS, move || {
            let _ = button.style().set_property("transition", "");
        }));
    }

    // === Position and visibility ===

    fn apply_config_position(&self) {
        let config = self.state.borrow().config();
        let size = self.control_size();
        let viewport = self.viewport();
        let position = if config.is_unpositioned() {
            default_position(size, viewport)
        } else {
            // Stored coordinates can be stale: saved by a wider window, or
            // left behind by a resize while the control was hidden. Re-snap
            // them instead of applying them verbatim.
            dock_position(
                Rect::new(f64::from(config.x), f64::from(config.y), size.width, size.height),
                viewport,
            )
        };
        self.apply_control_position(position);
    }

    fn apply_control_position(&self, position: Point) {
        let style = self.button.style();
        let _ = style.set_property("left", &px(position.x));
        let _ = style.set_property("top", &px(position.y));
    }

    fn apply_visibility(&self) {
        let state = self.state.borrow();
        set_display(&self.button, if state.is_visible() { "flex" } else { "none" });
        if !state.panel_open() {
            set_display(&self.panel, "none");
        }
    }

    fn toggle_visibility(&self) {
        let visible = self.state.borrow_mut().toggle_visible();
        if visible {
            // Position may never have been applied while hidden.
            self.apply_config_position();
        }
        self.persist();
        self.apply_visibility();
        self.show_toast(if visible { "Widget shown" } else { "Widget hidden" });
    }

    fn hide(&self) {
        self.state.borrow_mut().set_visible(false);
        self.persist();
        self.apply_visibility();
    }

    // === Panel ===

    fn toggle_panel(&self) {
        let open = self.state.borrow_mut().toggle_panel();
        self.set_panel_open(open);
    }

    fn close_panel(&self) {
        self.state.borrow_mut().close_panel();
        set_display(&self.panel, "none");
    }

    fn set_panel_open(&self, open: bool) {
        if open {
            // The panel needs a layout box before it can be measured.
            set_display(&self.panel, "flex");
            self.position_panel();
        } else {
            set_display(&self.panel, "none");
        }
    }

    fn position_panel(&self) {
        let control = self.button_rect();
        let rect = self.panel.get_bounding_client_rect();
        let target = panel_position(
            control,
            Size::new(rect.width(), rect.height()),
            self.viewport(),
        );
        let style = self.panel.style();
        let _ = style.set_property("left", &px(target.x));
        let _ = style.set_property("top", &px(target.y));
    }

    // === Decorator entries ===

    fn render_entries(self: &Rc<Self>, source: &str) {
        *self.raw_source.borrow_mut() = source.to_string();
        let entries = parse_decorators(source);
        debug!(count = entries.len(), "decorator panel rendered");

        self.panel_body.set_inner_html("");
        let mut listeners = Vec::new();

        if let Ok(item) = self.document.create_element("div") {
            item.set_class_name("pd-item pd-init");
            item.set_text_content(Some("Insert full template"));
            let inner = Rc::clone(self);
            listeners.push(EventListener::new(&item, "click", move |_event: &Event| {
                inner.insert_full_template();
            }));
            let _ = self.panel_body.append_child(&item);
        }

        for entry in entries {
            let Ok(item) = self.document.create_element("div") else {
                continue;
            };
            item.set_class_name("pd-item");
            let Ok(label) = self.document.create_element("strong") else {
                continue;
            };
            label.set_text_content(Some(entry.command.as_str()));
            let Ok(tooltip) = self.document.create_element("div") else {
                continue;
            };
            tooltip.set_class_name("pd-tooltip");
            tooltip.set_text_content(Some(&entry.description));
            let _ = item.append_child(&label);
            let _ = item.append_child(&tooltip);

            let inner = Rc::clone(self);
            let command = entry.command;
            listeners.push(EventListener::new(&item, "click", move |_event: &Event| {
                inner.insert_decorator(command.as_str());
            }));
            let _ = self.panel_body.append_child(&item);
        }

        *self.entry_listeners.borrow_mut() = listeners;
    }

    fn insert_full_template(&self) {
        let Some(surface) = locate(&self.document) else {
            self.toast_error(&WidgetError::NoSurfaceFound);
            return;
        };
        let raw = self.raw_source.borrow().trim().to_string();
        insert_bulk(&surface, &raw);
        self.show_toast("Full template inserted.");
    }

    fn insert_decorator(&self, command: &str) {
        let Some(surface) = locate(&self.document) else {
            self.toast_error(&WidgetError::NoSurfaceFound);
            return;
        };
        match begin_typed_insert(&surface, command) {
            Ok(session) => {
                // Last writer wins: storing the new task drops any run
                // still typing.
                let mut typing = self.typing.borrow_mut();
                if typing.as_ref().is_some_and(TypingTask::is_active) {
                    debug!(command, "superseding an in-flight typed insertion");
                }
                *typing = Some(TypingTask::start(surface, session));
            }
            Err(err) => self.toast_error(&err),
        }
    }

    // === Toast ===

    /// Map a recovered error to its user-facing notice. Errors without a
    /// notice are logged only.
    fn toast_error(&self, err: &WidgetError) {
        let message = match err {
            WidgetError::NoSurfaceFound => "No text input found on this page.",
            WidgetError::DuplicateContent => "Already added.",
            _ => {
                warn!(%err, "widget operation failed");
                return;
            }
        };
        self.show_toast(message);
    }

    fn show_toast(&self, message: &str) {
        self.toast.set_text_content(Some(message));
        let _ = self.toast.class_list().add_1("show");
        let toast = self.toast.clone();
        *self.toast_timer.borrow_mut() = Some(Timeout::new(TOAST_MS, move || {
            let _ = toast.class_list().remove_1("show");
        }));
    }

    // === Measurement ===

    fn viewport(&self) -> Viewport {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let client = self
            .document
            .document_element()
            .map(|el| f64::from(el.client_width()))
            .unwrap_or(width);
        Viewport::new(width, height, (width - client).max(0.0))
    }

    fn button_rect(&self) -> Rect {
        let rect = self.button.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn control_size(&self) -> Size {
        let size = self.button_rect().size();
        if size.width > 0.0 {
            size
        } else {
            Size::new(CONTROL_SIZE_PX, CONTROL_SIZE_PX)
        }
    }

    fn persist(&self) {
        let config = self.state.borrow().config();
        self.store.store(&self.storage_key, &config);
    }

    fn teardown(&self) {
        self.listeners.borrow_mut().clear();
        self.entry_listeners.borrow_mut().clear();
        self.drag_listeners.borrow_mut().take();
        self.typing.borrow_mut().take();
        self.toast_timer.borrow_mut().take();
        self.transition_timer.borrow_mut().take();
        self.host.remove();
    }
}

// === DOM construction ===

struct BuiltDom {
    host: HtmlElement,
    button: HtmlElement,
    close_button: HtmlElement,
    panel: HtmlElement,
    panel_close: HtmlElement,
    panel_body: HtmlElement,
    toast: HtmlElement,
}

fn build_dom(document: &Document) -> Result<BuiltDom, MountError> {
    let host = create_html(document, "div")?;
    host.set_id(HOST_ID);
    let shadow = host
        .attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))
        .map_err(js_err)?;

    let style = create_html(document, "style")?;
    style.set_text_content(Some(STYLE));
    shadow.append_child(&style).map_err(js_err)?;

    let button = create_html(document, "div")?;
    button.set_id("pd-btn");
    let _ = button.set_attribute("title", "Prompt decorators");
    let label = create_html(document, "span")?;
    label.set_text_content(Some("++"));
    button.append_child(&label).map_err(js_err)?;

    let close_button = create_html(document, "span")?;
    close_button.set_id("pd-btn-close");
    close_button.set_text_content(Some("×"));
    let _ = close_button.set_attribute("title", "Hide");
    button.append_child(&close_button).map_err(js_err)?;

    let panel = create_html(document, "div")?;
    panel.set_id("pd-panel");

    let header = create_html(document, "div")?;
    header.set_id("pd-header");
    let title = create_html(document, "span")?;
    title.set_text_content(Some("Prompt Decorators"));
    let panel_close = create_html(document, "span")?;
    panel_close.set_id("pd-close");
    panel_close.set_text_content(Some("×"));
    header.append_child(&title).map_err(js_err)?;
    header.append_child(&panel_close).map_err(js_err)?;

    let panel_body = create_html(document, "div")?;
    panel_body.set_id("pd-body");
    panel_body.set_text_content(Some("Loading…"));

    panel.append_child(&header).map_err(js_err)?;
    panel.append_child(&panel_body).map_err(js_err)?;

    let toast = create_html(document, "div")?;
    toast.set_id("pd-toast");

    shadow.append_child(&button).map_err(js_err)?;
    shadow.append_child(&panel).map_err(js_err)?;
    shadow.append_child(&toast).map_err(js_err)?;

    Ok(BuiltDom {
        host,
        button,
        close_button,
        panel,
        panel_close,
        panel_body,
        toast,
    })
}

fn create_html(document: &Document, tag: &str) -> Result<HtmlElement, MountError> {
    document
        .create_element(tag)
        .map_err(js_err)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| MountError::Dom(format!("<{tag}> is not an HtmlElement")))
}

fn js_err(err: JsValue) -> MountError {
    MountError::Dom(format!("{err:?}"))
}

fn px(value: f64) -> String {
    format!("{value}px")
}

fn set_display(element: &HtmlElement, value: &str) {
    let _ = element.style().set_property("display", value);
}

const STYLE: &str = r#"
:host {
    all: initial;
}

#pd-btn {
    position: fixed;
    width: 32px;
    height: 32px;
    border-radius: 50%;
    background: #2e7d32;
    color: #fff;
    font: 700 15px/1 system-ui, sans-serif;
    display: flex;
    align-items: center;
    justify-content: center;
    cursor: grab;
    user-select: none;
    box-shadow: 0 2px 8px rgba(0, 0, 0, 0.35);
    z-index: 2147483647;
}

#pd-btn:active {
    cursor: grabbing;
}

#pd-btn-close {
    position: absolute;
    top: -6px;
    right: -6px;
    width: 16px;
    height: 16px;
    border-radius: 50%;
    background: #b71c1c;
    color: #fff;
    font: 700 11px/16px sans-serif;
    text-align: center;
    cursor: pointer;
    display: none;
}

#pd-btn:hover #pd-btn-close {
    display: block;
}

#pd-panel {
    position: fixed;
    width: 300px;
    max-height: 70vh;
    display: none;
    flex-direction: column;
    background: #fff;
    border: 1px solid #c8e6c9;
    border-radius: 10px;
    box-shadow: 0 6px 24px rgba(0, 0, 0, 0.25);
    font: 13px/1.4 system-ui, sans-serif;
    color: #222;
    overflow: hidden;
    z-index: 2147483647;
}

#pd-header {
    display: flex;
    align-items: center;
    justify-content: space-between;
    padding: 8px 12px;
    background: #2e7d32;
    color: #fff;
    font-weight: 600;
}

#pd-close {
    cursor: pointer;
    padding: 0 4px;
}

#pd-body {
    overflow-y: auto;
    padding: 6px;
}

.pd-item {
    position: relative;
    padding: 7px 9px;
    border-radius: 6px;
    cursor: pointer;
}

.pd-item:hover {
    background: #e8f5e9;
}

.pd-item strong {
    color: #2e7d32;
}

.pd-tooltip {
    display: none;
    margin-top: 4px;
    padding: 6px 8px;
    border-radius: 6px;
    background: #263238;
    color: #eceff1;
    font-size: 12px;
    white-space: pre-wrap;
}

.pd-item:hover .pd-tooltip {
    display: block;
}

.pd-init {
    font-weight: 600;
    color: #1b5e20;
    border-bottom: 1px solid #e0e0e0;
    border-radius: 0;
    margin-bottom: 4px;
}

#pd-toast {
    position: fixed;
    left: 50%;
    bottom: 30px;
    transform: translateX(-50%);
    padding: 8px 14px;
    border-radius: 6px;
    background: rgba(33, 33, 33, 0.92);
    color: #fff;
    font: 13px system-ui, sans-serif;
    opacity: 0;
    transition: opacity 0.25s ease;
    pointer-events: none;
    z-index: 2147483647;
}

#pd-toast.show {
    opacity: 1;
}
"#;
