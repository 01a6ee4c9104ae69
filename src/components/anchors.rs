use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MouseEvent, ScrollBehavior, ScrollToOptions, Window};

use crate::dom;
use crate::error::WiringError;

/// Absolute offset to scroll to so the target clears the fixed header.
pub fn scroll_target(element_top: f64, page_y: f64, header_offset: f64) -> f64 {
    element_top + page_y - header_offset
}

/// Fragment selector for an in-page href, `None` for a bare `#`.
pub fn fragment_selector(href: &str) -> Option<&str> {
    match href.strip_prefix('#') {
        Some(id) if !id.is_empty() => Some(href),
        _ => None,
    }
}

pub fn wire(document: &Document, window: &Window, header_offset: f64) -> Result<(), WiringError> {
    let anchors: Vec<Element> = dom::query_all(document, "a[href^=\"#\"]")?;
    for anchor in anchors {
        let document = document.clone();
        let window = window.clone();
        let href = anchor.get_attribute("href").unwrap_or_default();
        let on_click = Closure::wrap(Box::new(move |e: MouseEvent| {
            e.prevent_default();
            let target = fragment_selector(&href)
                .and_then(|selector| document.query_selector(selector).ok().flatten());
            if let Some(target) = target {
                let page_y = window.page_y_offset().unwrap_or(0.0);
                let options = ScrollToOptions::new();
                options.set_top(scroll_target(target.get_bounding_client_rect().top(), page_y, header_offset));
                options.set_behavior(ScrollBehavior::Smooth);
                window.scroll_to_with_scroll_to_options(&options);
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        anchor.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }
    Ok(())
}
