//! The process-wide highlight callback.

use sourcecode_core::{EscapeHighlighter, Highlighter};
use wasm_bindgen::JsValue;
use web_sys::HtmlElement;

/// Highlighter installed through `on("highlight", ...)` or the built-in one.
#[derive(Debug, Clone, Default)]
pub enum HighlightCallback {
    /// HTML-escape only.
    #[default]
    Escape,
    /// `fn(code, language) -> string`, called with the host as `this`;
    /// `language` is `null` when unset.
    Js(js_sys::Function),
    #[cfg(feature = "syntax-highlighting")]
    Builtin(sourcecode_core::SyntectHighlighter),
}

impl HighlightCallback {
    /// Bind the callback to the element it renders for.
    pub fn for_host<'a>(&'a self, host: &'a HtmlElement) -> BoundHighlighter<'a> {
        BoundHighlighter {
            callback: self,
            host,
        }
    }
}

/// A highlight callback paired with the host used as its `this`.
pub struct BoundHighlighter<'a> {
    callback: &'a HighlightCallback,
    host: &'a HtmlElement,
}

impl Highlighter for BoundHighlighter<'_> {
    type Error = JsValue;

    fn highlight(&self, code: &str, language: Option<&str>) -> Result<String, JsValue> {
        match self.callback {
            HighlightCallback::Escape => match EscapeHighlighter.highlight(code, language) {
                Ok(html) => Ok(html),
                Err(never) => match never {},
            },
            HighlightCallback::Js(function) => {
                let language = language.map_or(JsValue::NULL, JsValue::from_str);
                let result = function.call2(self.host, &JsValue::from_str(code), &language)?;
                if result.is_null() || result.is_undefined() {
                    return Ok(String::new());
                }
                Ok(result.as_string().unwrap_or_else(|| {
                    tracing::warn!("highlight callback returned a non-string value");
                    String::new()
                }))
            }
            #[cfg(feature = "syntax-highlighting")]
            HighlightCallback::Builtin(highlighter) => highlighter
                .highlight(code, language)
                .map_err(|e| js_sys::Error::new(&e.to_string()).into()),
        }
    }
}
