//! Entry points for the custom element's lifecycle callbacks.
//!
//! The element class itself is defined on the JS side; each of its
//! callbacks forwards the host element here, and the instance is looked up
//! in the registry.

use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement};

use crate::component::CodeBlock;
use crate::dom::stylesheet_element;
use crate::error::DomError;
use crate::registry;

fn instance(host: &HtmlElement) -> Result<Rc<CodeBlock>, DomError> {
    registry::find(host).ok_or(DomError::Unregistered)
}

/// Element constructor: build the shadow DOM.
pub fn construct(host: HtmlElement, css: &str) -> Result<(), JsValue> {
    CodeBlock::new(host, css)?;
    Ok(())
}

pub fn connected(host: &HtmlElement) -> Result<(), JsValue> {
    instance(host)?.connected();
    Ok(())
}

pub fn disconnected(host: &HtmlElement) -> Result<(), JsValue> {
    instance(host)?.disconnected();
    Ok(())
}

pub fn attribute_changed(
    host: &HtmlElement,
    name: &str,
    old: Option<String>,
    new: Option<String>,
) -> Result<(), JsValue> {
    // No instance means construction failed; there is nothing to update.
    match registry::find(host) {
        Some(block) => block.attribute_changed(name, old, new),
        None => Ok(()),
    }
}

/// `element.code` getter.
pub fn code(host: &HtmlElement) -> Result<Option<String>, JsValue> {
    Ok(instance(host)?.code())
}

/// `element.code = ...` setter.
pub fn set_code(host: &HtmlElement, code: &str) -> Result<(), JsValue> {
    instance(host)?.set_code(code)
}

/// `element.update()`.
pub fn update(host: &HtmlElement) -> Result<(), JsValue> {
    instance(host)?.update()
}

/// Share a stylesheet with every instance. Accepts an element (cloned into
/// each shadow root), an href, or CSS rules.
pub fn add_stylesheet(stylesheet: &JsValue) -> Result<(), JsValue> {
    let element = match stylesheet.dyn_ref::<Element>() {
        Some(element) => element.clone(),
        None => {
            let source = stylesheet
                .as_string()
                .ok_or_else(|| js_sys::TypeError::new("stylesheet must be an element or a string"))?;
            stylesheet_element(&source)?
        }
    };
    registry::add_stylesheet(element);
    Ok(())
}
