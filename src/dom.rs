use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::error::WiringError;

pub fn window() -> Result<Window, WiringError> {
    web_sys::window().ok_or(WiringError::NoWindow)
}

pub fn document(window: &Window) -> Result<Document, WiringError> {
    window.document().ok_or(WiringError::NoDocument)
}

pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, WiringError> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| WiringError::MissingElement { selector: format!("#{}", id) })?;
    cast(element, &format!("#{}", id))
}

pub fn query<T: JsCast>(root: &Element, selector: &str) -> Result<T, WiringError> {
    let element = root
        .query_selector(selector)?
        .ok_or_else(|| WiringError::MissingElement { selector: selector.to_string() })?;
    cast(element, selector)
}

pub fn query_doc<T: JsCast>(document: &Document, selector: &str) -> Result<T, WiringError> {
    let element = document
        .query_selector(selector)?
        .ok_or_else(|| WiringError::MissingElement { selector: selector.to_string() })?;
    cast(element, selector)
}

/// All matches in document order. Nodes that are not `T` are skipped.
pub fn query_all<T: JsCast>(document: &Document, selector: &str) -> Result<Vec<T>, WiringError> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect())
}

pub fn query_all_in<T: JsCast>(root: &Element, selector: &str) -> Result<Vec<T>, WiringError> {
    let list = root.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect())
}

fn cast<T: JsCast>(element: Element, selector: &str) -> Result<T, WiringError> {
    element.dyn_into::<T>().map_err(|_| WiringError::WrongElementType {
        selector: selector.to_string(),
        expected: std::any::type_name::<T>().rsplit("::").next().unwrap_or("element"),
    })
}

pub fn set_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}

pub fn has_class(element: &Element, class: &str) -> bool {
    element.class_list().contains(class)
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}
