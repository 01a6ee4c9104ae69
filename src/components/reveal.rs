use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Document, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::WiringError;

pub const HIDDEN: (&str, &str) = ("0", "translateY(30px)");
pub const SHOWN: (&str, &str) = ("1", "translateY(0)");

fn apply(element: &HtmlElement, (opacity, transform): (&str, &str)) {
    dom::set_style(element, "opacity", opacity);
    dom::set_style(element, "transform", transform);
}

pub fn wire(document: &Document, config: &SiteConfig) -> Result<(), WiringError> {
    let selector = config.reveal_selector();
    if selector.is_empty() {
        return Ok(());
    }
    let elements: Vec<HtmlElement> = dom::query_all(document, &selector)?;

    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if !entry.is_intersecting() {
                continue;
            }
            let target = entry.target();
            if let Some(element) = target.dyn_ref::<HtmlElement>() {
                apply(element, SHOWN);
            }
            observer.unobserve(&target);
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(config.reveal_threshold));
    options.set_root_margin(&config.reveal_root_margin);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();

    for element in &elements {
        apply(element, HIDDEN);
        dom::set_style(element, "transition", "opacity 0.6s ease, transform 0.6s ease");
        observer.observe(element);
    }
    Ok(())
}

/// Fades the whole page in shortly after startup.
pub fn fade_in_body(document: &Document, delay_ms: u32) {
    let Some(body) = document.body() else {
        return;
    };
    dom::set_style(&body, "opacity", "0");
    dom::set_style(&body, "transition", "opacity 0.5s ease");
    Timeout::new(delay_ms, move || dom::set_style(&body, "opacity", "1")).forget();
}
