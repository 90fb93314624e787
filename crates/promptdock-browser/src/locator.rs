//! Prompt surface discovery.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

use crate::surface::DomSurface;

/// Candidate selectors for the host page's prompt surface, in preference
/// order. The id is ChatGPT's composer, the ProseMirror class covers
/// several rich editors, the last two are generic fallbacks.
pub const SURFACE_SELECTORS: &[&str] = &[
    "#prompt-textarea",
    "div.ProseMirror",
    "[contenteditable=\"true\"]",
    "textarea",
];

/// Find the page's prompt surface.
///
/// Tries each selector in order and takes the first rendered match, where
/// rendered means the element participates in layout and has height.
/// Falls back to the focused element when no selector hits, since on some
/// hosts the composer only appears after a click.
pub fn locate(document: &Document) -> Option<DomSurface> {
    for selector in SURFACE_SELECTORS {
        let Ok(nodes) = document.query_selector_all(selector) else {
            continue;
        };
        for index in 0..nodes.length() {
            let Some(element) = nodes
                .get(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            if !is_rendered(&element) {
                continue;
            }
            if let Some(surface) = classify(element) {
                return Some(surface);
            }
        }
    }

    document.active_element().and_then(classify)
}

fn is_rendered(element: &Element) -> bool {
    let Some(html) = element.dyn_ref::<HtmlElement>() else {
        return false;
    };
    html.offset_parent().is_some() && element.get_bounding_client_rect().height() > 0.0
}

fn classify(element: Element) -> Option<DomSurface> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        if html.is_content_editable() {
            return Some(DomSurface::Rich(html.clone()));
        }
    }
    match element.dyn_into::<HtmlTextAreaElement>() {
        Ok(area) => Some(DomSurface::TextArea(area)),
        Err(element) => element
            .dyn_into::<HtmlInputElement>()
            .ok()
            .map(DomSurface::Input),
    }
}
