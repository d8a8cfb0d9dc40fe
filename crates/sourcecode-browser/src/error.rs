//! DOM-layer errors.

use wasm_bindgen::JsValue;

#[derive(thiserror::Error, Debug, Clone)]
pub enum DomError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    /// A node the shadow template is supposed to contain is missing.
    #[error("shadow root is missing {0}")]
    MissingNode(&'static str),

    /// The element was never constructed through the registry.
    #[error("element is not a registered code block")]
    Unregistered,

    /// A DOM call threw.
    #[error("DOM call failed: {0}")]
    Js(String),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        DomError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<DomError> for JsValue {
    fn from(err: DomError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
