//! Static configuration surface shared by every element instance.
//!
//! Each setter updates the process-wide registry; the ones that change
//! rendered output re-render every connected instance before returning, so
//! a throwing highlight callback surfaces here as an exception.

use sourcecode_browser::{Attribute, CopyCallback, HighlightCallback, SmolStr, registry};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::types::{ConfigOverrides, JsConfig};

/// Install a callback.
///
/// - `"highlight"`: `fn(code, language) -> string` returning HTML for the
///   whole code. Called with the element as `this`.
/// - `"copy"`: `fn(refs)` run after the code is copied, replacing the default
///   button feedback. `refs` holds `host`, `display`, `table`, `edit` and
///   `copy`.
#[wasm_bindgen]
pub fn on(event: &str, callback: js_sys::Function) -> Result<(), JsValue> {
    match event {
        "highlight" => registry::set_highlight_callback(HighlightCallback::Js(callback)),
        "copy" => {
            registry::set_copy_callback(CopyCallback::Js(callback));
            Ok(())
        }
        other => {
            tracing::warn!(event = other, "unknown callback event, ignoring");
            Ok(())
        }
    }
}

/// Merge `overrides` into the shared configuration and return the result.
/// Call without arguments to read the current configuration.
#[wasm_bindgen]
pub fn config(overrides: JsValue) -> Result<JsConfig, JsValue> {
    if !overrides.is_undefined() && !overrides.is_null() {
        let overrides: ConfigOverrides = serde_wasm_bindgen::from_value(overrides)
            .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
        tracing::debug!(?overrides, "updating config");
        registry::configure(|config| overrides.apply(config))?;
    }
    Ok(registry::config().into())
}

/// Force boolean attributes on every instance, e.g. `{ copy: true }`.
/// Values other than booleans are ignored.
#[wasm_bindgen(js_name = globalAttrs)]
pub fn global_attrs(attrs: &js_sys::Object) -> Result<(), JsValue> {
    let mut overrides = Vec::new();
    for entry in js_sys::Object::entries(attrs).iter() {
        let entry: js_sys::Array = entry.unchecked_into();
        let Some(name) = entry.get(0).as_string() else {
            continue;
        };
        let Some(value) = entry.get(1).as_bool() else {
            tracing::debug!(attribute = %name, "ignoring non-boolean global attribute");
            continue;
        };
        let name = name.to_ascii_lowercase();
        if Attribute::from_name(&name).is_none() {
            tracing::debug!(attribute = %name, "global attribute is not observed");
        }
        overrides.push((SmolStr::from(name), value));
    }
    registry::set_global_attributes(overrides)
}

/// Share a stylesheet with every existing and future instance: an element
/// (cloned into each shadow root), an href, or a block of CSS rules.
#[wasm_bindgen(js_name = addStylesheet)]
pub fn add_stylesheet(stylesheet: JsValue) -> Result<(), JsValue> {
    sourcecode_browser::element::add_stylesheet(&stylesheet)
}

/// Highlight with the bundled syntect grammars instead of a JS callback.
/// Output uses `sc-`-prefixed classes.
#[cfg(feature = "syntax-highlighting")]
#[wasm_bindgen(js_name = useBuiltinHighlighter)]
pub fn use_builtin_highlighter() -> Result<(), JsValue> {
    registry::set_highlight_callback(HighlightCallback::Builtin(
        sourcecode_browser::SyntectHighlighter::new(),
    ))
}
