//! [`TextSurface`] adapters over concrete DOM editors.
//!
//! Caret-positioned insertion goes through the document `insertText`
//! command so the host page's own editor state (undo stack, framework
//! bindings) sees the change. Engines that refuse the command surface
//! [`InsertUnsupported`] and the caller degrades to direct assignment.

use wasm_bindgen::JsCast;
use web_sys::{
    Event, EventInit, HtmlDocument, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
    KeyboardEvent, KeyboardEventInit,
};

use promptdock_core::surface::{InsertUnsupported, SurfaceKind, TextSurface};

/// A located prompt surface on the host page.
#[derive(Debug, Clone)]
pub enum DomSurface {
    TextArea(HtmlTextAreaElement),
    Input(HtmlInputElement),
    Rich(HtmlElement),
}

impl DomSurface {
    fn element(&self) -> &HtmlElement {
        match self {
            DomSurface::TextArea(el) => el,
            DomSurface::Input(el) => el,
            DomSurface::Rich(el) => el,
        }
    }
}

impl TextSurface for DomSurface {
    fn kind(&self) -> SurfaceKind {
        match self {
            DomSurface::Rich(_) => SurfaceKind::RichEditable,
            _ => SurfaceKind::PlainField,
        }
    }

    fn focus(&self) {
        let _ = self.element().focus();
    }

    fn read(&self) -> String {
        match self {
            DomSurface::TextArea(area) => area.value(),
            DomSurface::Input(input) => input.value(),
            DomSurface::Rich(el) => el.inner_text(),
        }
    }

    fn clear(&self) {
        match self {
            DomSurface::TextArea(area) => area.set_value(""),
            DomSurface::Input(input) => input.set_value(""),
            DomSurface::Rich(el) => el.set_inner_html(""),
        }
    }

    fn insert_at_cursor(&self, text: &str) -> Result<(), InsertUnsupported> {
        let inserted = html_document()
            .and_then(|doc| {
                doc.exec_command_with_show_ui_and_value("insertText", false, text)
                    .ok()
            })
            .unwrap_or(false);
        if inserted { Ok(()) } else { Err(InsertUnsupported) }
    }

    fn insert_line_break(&self) -> Result<(), InsertUnsupported> {
        // Rich editors key their paragraph handling off keydown, so a
        // synthetic Shift+Enter goes out before the newline itself.
        if let DomSurface::Rich(el) = self {
            dispatch_line_break_key(el);
        }
        self.insert_at_cursor("\n")
    }

    fn append_raw(&self, text: &str) {
        match self {
            DomSurface::TextArea(area) => area.set_value(&(area.value() + text)),
            DomSurface::Input(input) => input.set_value(&(input.value() + text)),
            DomSurface::Rich(el) => {
                let mut current = el.inner_text();
                current.push_str(text);
                el.set_inner_text(&current);
            }
        }
    }

    fn move_caret_to_end(&self) {
        match self {
            DomSurface::Rich(el) => {
                let Some(document) = el.owner_document() else {
                    return;
                };
                let Ok(range) = document.create_range() else {
                    return;
                };
                let _ = range.select_node_contents(el);
                range.collapse_with_to_start(false);
                let Some(selection) = web_sys::window().and_then(|w| w.get_selection().ok().flatten())
                else {
                    return;
                };
                let _ = selection.remove_all_ranges();
                let _ = selection.add_range(&range);
            }
            DomSurface::TextArea(area) => {
                // Selection offsets are UTF-16 code units, not bytes.
                let end = utf16_len(&area.value());
                let _ = area.set_selection_range(end, end);
            }
            DomSurface::Input(input) => {
                let end = utf16_len(&input.value());
                let _ = input.set_selection_range(end, end);
            }
        }
    }

    fn scroll_to_caret(&self) {
        let el = self.element();
        el.set_scroll_top(el.scroll_height());
    }

    fn notify_changed(&self) {
        let target = self.element();
        for kind in ["input", "change", "keyup"] {
            let init = EventInit::new();
            init.set_bubbles(true);
            if let Ok(event) = Event::new_with_event_init_dict(kind, &init) {
                let _ = target.dispatch_event(&event);
            }
        }
    }
}

fn html_document() -> Option<HtmlDocument> {
    web_sys::window()?
        .document()?
        .dyn_into::<HtmlDocument>()
        .ok()
}

fn dispatch_line_break_key(target: &HtmlElement) {
    let init = KeyboardEventInit::new();
    init.set_key("Enter");
    init.set_code("Enter");
    init.set_key_code(13);
    init.set_shift_key(true);
    init.set_bubbles(true);
    if let Ok(event) = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init) {
        let _ = target.dispatch_event(&event);
    }
}

fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}
