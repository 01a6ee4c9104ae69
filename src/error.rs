use thiserror::Error;
use wasm_bindgen::JsValue;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Пожалуйста, заполните обязательные поля";

/// Failures while binding behaviours to the page markup. Any of these aborts
/// startup before a single listener is attached.
#[derive(Debug, Error, PartialEq)]
pub enum WiringError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("required element `{selector}` is missing")]
    MissingElement { selector: String },
    #[error("element `{selector}` is not a {expected}")]
    WrongElementType { selector: String, expected: &'static str },
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for WiringError {
    fn from(value: JsValue) -> Self {
        WiringError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", REQUIRED_FIELDS_MESSAGE)]
    MissingRequired { fields: Vec<&'static str> },
}
