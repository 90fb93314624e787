//! WASM browser tests for promptdock-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use std::cell::Cell;
use std::rc::Rc;

use gloo_events::EventListener;
use gloo_storage::{LocalStorage, Storage};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, HtmlInputElement, HtmlTextAreaElement, NodeList};

use promptdock_browser::{
    ConfigStore, DomSurface, HOST_ID, LocalConfigStore, OverlayWidget, TOGGLE_EVENT, TextSurface,
    TypingTask, WidgetConfig, begin_typed_insert, insert_bulk, locate, storage_key,
};

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn append_textarea(id: &str) -> HtmlTextAreaElement {
    let document = document();
    let el = document
        .create_element("textarea")
        .unwrap()
        .dyn_into::<HtmlTextAreaElement>()
        .unwrap();
    el.set_id(id);
    document.body().unwrap().append_child(&el).unwrap();
    el
}

fn append_input(id: &str) -> HtmlInputElement {
    let document = document();
    let el = document
        .create_element("input")
        .unwrap()
        .dyn_into::<HtmlInputElement>()
        .unwrap();
    el.set_id(id);
    el.set_type("text");
    document.body().unwrap().append_child(&el).unwrap();
    el
}

/// Leftovers from a failed earlier test must not poison this one.
fn remove_stale_widget() {
    if let Some(host) = document().get_element_by_id(HOST_ID) {
        host.remove();
    }
}

fn test_host_key() -> String {
    let hostname = web_sys::window().unwrap().location().hostname().unwrap();
    storage_key(&hostname)
}

fn shadow_query(selector: &str) -> HtmlElement {
    document()
        .get_element_by_id(HOST_ID)
        .unwrap()
        .shadow_root()
        .unwrap()
        .query_selector(selector)
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap()
}

fn panel_items() -> NodeList {
    document()
        .get_element_by_id(HOST_ID)
        .unwrap()
        .shadow_root()
        .unwrap()
        .query_selector_all(".pd-item")
        .unwrap()
}

/// Read a `left`/`top` style value back as a number.
fn style_px(element: &HtmlElement, property: &str) -> f64 {
    element
        .style()
        .get_property_value(property)
        .unwrap()
        .trim_end_matches("px")
        .parse()
        .unwrap()
}

// === Locator tests ===

#[wasm_bindgen_test]
fn test_locate_prefers_selector_table_order() {
    let generic = append_textarea("later-generic");
    let composer = append_textarea("prompt-textarea");

    match locate(&document()) {
        Some(DomSurface::TextArea(el)) => assert_eq!(el.id(), "prompt-textarea"),
        other => panic!("expected the composer textarea, got {:?}", other),
    }

    generic.remove();
    composer.remove();
}

#[wasm_bindgen_test]
fn test_locate_skips_unrendered_candidates() {
    let hidden = append_textarea("hidden-candidate");
    hidden.style().set_property("display", "none").unwrap();
    let visible = append_textarea("visible-candidate");

    match locate(&document()) {
        Some(DomSurface::TextArea(el)) => assert_eq!(el.id(), "visible-candidate"),
        other => panic!("expected the visible textarea, got {:?}", other),
    }

    hidden.remove();
    visible.remove();
}

#[wasm_bindgen_test]
fn test_locate_falls_back_to_focused_element() {
    // Bare inputs match no selector; only the focus fallback can find one.
    let input = append_input("focused-input");
    input.focus().unwrap();

    match locate(&document()) {
        Some(DomSurface::Input(el)) => assert_eq!(el.id(), "focused-input"),
        other => panic!("expected the focused input, got {:?}", other),
    }

    input.remove();
}

#[wasm_bindgen_test]
fn test_locate_none_when_page_has_no_surface() {
    assert!(locate(&document()).is_none());
}

// === Surface adapter tests ===

#[wasm_bindgen_test]
fn test_plain_surface_clear_append_read() {
    let el = append_textarea("surface-rw");
    el.set_value("old");
    let surface = DomSurface::TextArea(el.clone());

    surface.clear();
    assert_eq!(surface.read(), "");
    surface.append_raw("첫 줄");
    surface.append_raw("\nsecond");
    assert_eq!(surface.read(), "첫 줄\nsecond");

    el.remove();
}

#[wasm_bindgen_test]
fn test_plain_surface_caret_moves_to_utf16_end() {
    let el = append_textarea("surface-caret");
    el.set_value("안녕하세요");
    let surface = DomSurface::TextArea(el.clone());

    surface.focus();
    surface.move_caret_to_end();
    // Hangul syllables are one UTF-16 unit each; bytes would land at 15.
    assert_eq!(el.selection_start().unwrap(), Some(5));
    assert_eq!(el.selection_end().unwrap(), Some(5));

    el.remove();
}

#[wasm_bindgen_test]
fn test_notify_changed_fires_input_change_keyup() {
    let el = append_textarea("surface-notify");
    let surface = DomSurface::TextArea(el.clone());

    let count = Rc::new(Cell::new(0u32));
    let mut listeners = Vec::new();
    for kind in ["input", "change", "keyup"] {
        let count = Rc::clone(&count);
        listeners.push(EventListener::new(&el, kind, move |_event: &Event| {
            count.set(count.get() + 1);
        }));
    }

    surface.notify_changed();
    assert_eq!(count.get(), 3);

    drop(listeners);
    el.remove();
}

#[wasm_bindgen_test]
fn test_rich_surface_read_and_clear() {
    let document = document();
    let el = document
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    el.set_attribute("contenteditable", "true").unwrap();
    el.set_text_content(Some("draft text"));
    document.body().unwrap().append_child(&el).unwrap();

    let surface = DomSurface::Rich(el.clone());
    assert_eq!(surface.read(), "draft text");
    surface.clear();
    assert_eq!(surface.read(), "");

    el.remove();
}

// === Injection tests ===

#[wasm_bindgen_test]
fn test_insert_bulk_replaces_content_and_notifies() {
    let el = append_textarea("bulk-target");
    el.set_value("stale draft");
    let surface = DomSurface::TextArea(el.clone());

    // Count change events: the insert-text command fires its own trusted
    // input event when it works, but never a change.
    let count = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&count);
    let listener = EventListener::new(&el, "change", move |_event: &Event| {
        counter.set(counter.get() + 1);
    });

    insert_bulk(&surface, "+협업\n+예시");
    assert_eq!(el.value(), "+협업\n+예시");
    assert_eq!(count.get(), 1);

    drop(listener);
    el.remove();
}

#[wasm_bindgen_test]
async fn test_typed_insertion_lands_whole_command() {
    let el = append_textarea("typed-target");
    el.set_value("draft");
    let surface = DomSurface::TextArea(el.clone());

    let session = begin_typed_insert(&surface, "++후속 질문 3개").unwrap();
    let task = TypingTask::start(surface, session);
    assert!(task.is_active());

    // The run needs a dozen 1ms ticks; 200ms leaves slack even with
    // nested-timer clamping.
    TimeoutFuture::new(200).await;
    assert_eq!(el.value(), "draft\n++후속 질문 3개");
    // The batch tick fired and left nothing scheduled.
    assert!(!task.is_active());

    el.remove();
}

#[wasm_bindgen_test]
fn test_typed_insertion_refuses_duplicate() {
    let el = append_textarea("typed-duplicate");
    el.set_value("already has ++반말 here");
    let surface = DomSurface::TextArea(el.clone());

    assert!(begin_typed_insert(&surface, "++반말").is_err());
    assert_eq!(el.value(), "already has ++반말 here");

    el.remove();
}

// === Storage tests ===

#[wasm_bindgen_test]
fn test_config_round_trip() {
    let key = "promptdock_test-roundtrip";
    let mut config = WidgetConfig::for_host("example.com");
    config.set_position(12, 400);
    config.visible = true;

    LocalConfigStore.store(key, &config);
    let stored = LocalConfigStore.load(key).unwrap();
    // A freshly written blob carries every field, so the host contributes
    // nothing to the merge.
    assert_eq!(stored.into_config("example.com"), config);

    LocalStorage::delete(key);
}

#[wasm_bindgen_test]
fn test_missing_and_corrupt_configs_load_as_none() {
    assert_eq!(LocalConfigStore.load("promptdock_test-missing"), None);

    let key = "promptdock_test-corrupt";
    LocalStorage::raw().set_item(key, "{not json").unwrap();
    assert_eq!(LocalConfigStore.load(key), None);

    LocalStorage::delete(key);
}

#[wasm_bindgen_test]
fn test_partial_config_merges_over_host_defaults() {
    let key = "promptdock_test-partial";
    LocalStorage::raw().set_item(key, r#"{"x":12,"y":40}"#).unwrap();

    let stored = LocalConfigStore.load(key).unwrap();
    assert_eq!((stored.x, stored.y, stored.visible), (Some(12), Some(40), None));
    // The absent field keeps the hostname rule instead of zeroing out.
    assert!(stored.into_config("claude.ai").visible);
    assert!(!stored.into_config("example.com").visible);

    LocalStorage::delete(key);
}

// === Widget tests ===

#[wasm_bindgen_test]
fn test_mount_is_exclusive_per_page() {
    remove_stale_widget();
    let key = test_host_key();
    LocalStorage::delete(&key);

    let widget = OverlayWidget::mount().unwrap();
    assert!(document().get_element_by_id(HOST_ID).is_some());
    assert!(OverlayWidget::mount().is_err());

    widget.unmount();
    assert!(document().get_element_by_id(HOST_ID).is_none());
    LocalStorage::delete(&key);
}

#[wasm_bindgen_test]
fn test_toggle_event_flips_visibility() {
    remove_stale_widget();
    let key = test_host_key();
    LocalStorage::delete(&key);

    // The test host is not a known chat domain, so the widget starts hidden.
    let widget = OverlayWidget::mount().unwrap();
    assert!(!widget.is_visible());

    let window = web_sys::window().unwrap();
    window
        .dispatch_event(&Event::new(TOGGLE_EVENT).unwrap())
        .unwrap();
    assert!(widget.is_visible());
    window
        .dispatch_event(&Event::new(TOGGLE_EVENT).unwrap())
        .unwrap();
    assert!(!widget.is_visible());

    widget.unmount();
    LocalStorage::delete(&key);
}

#[wasm_bindgen_test]
fn test_showing_heals_offscreen_stored_position() {
    remove_stale_widget();
    let key = test_host_key();
    let hostname = web_sys::window().unwrap().location().hostname().unwrap();

    // Coordinates persisted by a much larger window, as after shrinking
    // the viewport while the control was hidden.
    let mut config = WidgetConfig::for_host(&hostname);
    config.visible = false;
    config.set_position(5000, 4000);
    LocalConfigStore.store(&key, &config);

    let widget = OverlayWidget::mount().unwrap();
    assert!(!widget.is_visible());

    // Resizes while hidden are ignored: nothing docks, nothing persists.
    let window = web_sys::window().unwrap();
    window
        .dispatch_event(&Event::new("resize").unwrap())
        .unwrap();
    let stored = LocalConfigStore.load(&key).unwrap();
    assert_eq!((stored.x, stored.y), (Some(5000), Some(4000)));

    // Showing re-snaps the stale coordinates into the current viewport.
    widget.toggle();
    assert!(widget.is_visible());

    let button = shadow_query("#pd-btn");
    let left = style_px(&button, "left");
    let top = style_px(&button, "top");
    let width = window.inner_width().unwrap().as_f64().unwrap();
    let height = window.inner_height().unwrap().as_f64().unwrap();
    assert!(left >= 0.0 && left + 32.0 <= width, "left {left} vs {width}");
    assert!(top >= 0.0 && top + 32.0 <= height, "top {top} vs {height}");

    widget.unmount();
    LocalStorage::delete(&key);
}

#[wasm_bindgen_test]
fn test_hiding_the_control_closes_the_panel() {
    remove_stale_widget();
    let key = test_host_key();
    let hostname = web_sys::window().unwrap().location().hostname().unwrap();
    let mut config = WidgetConfig::for_host(&hostname);
    config.visible = true;
    config.set_position(40, 40);
    LocalConfigStore.store(&key, &config);

    let widget = OverlayWidget::mount().unwrap();
    assert!(widget.is_visible());
    widget.toggle_panel();
    assert!(widget.panel_open());

    // Click the hover close affordance inside the shadow tree.
    let close = shadow_query("#pd-btn-close");
    close.dispatch_event(&Event::new("click").unwrap()).unwrap();

    assert!(!widget.is_visible());
    assert!(!widget.panel_open());

    widget.unmount();
    LocalStorage::delete(&key);
}

#[wasm_bindgen_test]
fn test_panel_stays_closed_while_hidden() {
    remove_stale_widget();
    let key = test_host_key();
    LocalStorage::delete(&key);

    let widget = OverlayWidget::mount().unwrap();
    assert!(!widget.is_visible());
    widget.toggle_panel();
    assert!(!widget.panel_open());

    widget.unmount();
    LocalStorage::delete(&key);
}

#[wasm_bindgen_test]
fn test_render_entries_builds_panel_items() {
    remove_stale_widget();
    let key = test_host_key();
    LocalStorage::delete(&key);

    let widget = OverlayWidget::mount().unwrap();
    widget.render_entries(
        "#### `+하나` description one\n-------------------\n#### `++둘` description two",
    );

    let body = shadow_query("#pd-body");
    // One full-template entry plus the two parsed decorators.
    assert_eq!(body.children().length(), 3);
    let first = body.children().item(0).unwrap();
    assert_eq!(first.text_content().unwrap(), "Insert full template");

    widget.unmount();
    LocalStorage::delete(&key);
}

#[wasm_bindgen_test]
fn test_entry_click_without_surface_shows_toast() {
    remove_stale_widget();
    let key = test_host_key();
    LocalStorage::delete(&key);

    let widget = OverlayWidget::mount().unwrap();
    widget.render_entries("#### `++기본`\n기본 데코레이터입니다.");

    // Item 0 is the full-template entry; 1 is the parsed decorator.
    let entry = panel_items()
        .get(1)
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    entry.click();

    let toast = shadow_query("#pd-toast");
    assert_eq!(
        toast.text_content().unwrap(),
        "No text input found on this page."
    );
    assert!(toast.class_list().contains("show"));

    widget.unmount();
    LocalStorage::delete(&key);
}

#[wasm_bindgen_test]
fn test_entry_click_with_duplicate_leaves_content_alone() {
    remove_stale_widget();
    let key = test_host_key();
    LocalStorage::delete(&key);
    let area = append_textarea("duplicate-entry-target");
    area.set_value("draft already using ++기본 here");

    let widget = OverlayWidget::mount().unwrap();
    widget.render_entries("#### `++기본`\n기본 데코레이터입니다.");

    let entry = panel_items()
        .get(1)
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    entry.click();

    assert_eq!(area.value(), "draft already using ++기본 here");
    let toast = shadow_query("#pd-toast");
    assert_eq!(toast.text_content().unwrap(), "Already added.");

    area.remove();
    widget.unmount();
    LocalStorage::delete(&key);
}
