//! Custom element registration.
//!
//! Rust cannot extend `HTMLElement`, so the class itself is a thin JS shim
//! whose lifecycle callbacks forward to Rust closures. All behaviour lives in
//! `sourcecode_browser::element`.

use sourcecode_browser::{BASE_CSS, DEFAULT_TAG_NAME, element, observed_attributes};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

#[wasm_bindgen(inline_js = r#"
export function defineCodeBlock(tagName, observed, hooks) {
    if (customElements.get(tagName)) {
        return false;
    }
    class SourceCode extends HTMLElement {
        static get observedAttributes() {
            return observed;
        }
        constructor() {
            super();
            hooks.construct(this);
        }
        connectedCallback() {
            hooks.connected(this);
        }
        disconnectedCallback() {
            hooks.disconnected(this);
        }
        attributeChangedCallback(name, oldValue, newValue) {
            hooks.attributeChanged(this, name, oldValue, newValue);
        }
        get code() {
            return hooks.getCode(this);
        }
        set code(value) {
            hooks.setCode(this, String(value));
        }
        update() {
            hooks.update(this);
        }
    }
    customElements.define(tagName, SourceCode);
    return true;
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = defineCodeBlock, catch)]
    fn define_code_block(
        tag_name: &str,
        observed: &js_sys::Array,
        hooks: &js_sys::Object,
    ) -> Result<bool, JsValue>;
}

fn set_hook(hooks: &js_sys::Object, name: &str, hook: JsValue) -> Result<(), JsValue> {
    js_sys::Reflect::set(hooks, &JsValue::from_str(name), &hook)?;
    Ok(())
}

/// Lifecycle hooks handed to the element class. The closures live as long as
/// the element definition, i.e. for the rest of the page.
fn build_hooks(css: String) -> Result<js_sys::Object, JsValue> {
    let hooks = js_sys::Object::new();

    let construct = Closure::wrap(Box::new(move |host: HtmlElement| {
        element::construct(host, &css)
    }) as Box<dyn FnMut(HtmlElement) -> Result<(), JsValue>>);
    set_hook(&hooks, "construct", construct.into_js_value())?;

    let connected = Closure::wrap(Box::new(|host: HtmlElement| element::connected(&host))
        as Box<dyn FnMut(HtmlElement) -> Result<(), JsValue>>);
    set_hook(&hooks, "connected", connected.into_js_value())?;

    let disconnected = Closure::wrap(Box::new(|host: HtmlElement| element::disconnected(&host))
        as Box<dyn FnMut(HtmlElement) -> Result<(), JsValue>>);
    set_hook(&hooks, "disconnected", disconnected.into_js_value())?;

    let attribute_changed = Closure::wrap(Box::new(
        |host: HtmlElement, name: String, old: Option<String>, new: Option<String>| {
            element::attribute_changed(&host, &name, old, new)
        },
    )
        as Box<dyn FnMut(HtmlElement, String, Option<String>, Option<String>) -> Result<(), JsValue>>);
    set_hook(&hooks, "attributeChanged", attribute_changed.into_js_value())?;

    let get_code = Closure::wrap(Box::new(|host: HtmlElement| element::code(&host))
        as Box<dyn FnMut(HtmlElement) -> Result<Option<String>, JsValue>>);
    set_hook(&hooks, "getCode", get_code.into_js_value())?;

    let set_code = Closure::wrap(Box::new(|host: HtmlElement, code: String| {
        element::set_code(&host, &code)
    }) as Box<dyn FnMut(HtmlElement, String) -> Result<(), JsValue>>);
    set_hook(&hooks, "setCode", set_code.into_js_value())?;

    let update = Closure::wrap(Box::new(|host: HtmlElement| element::update(&host))
        as Box<dyn FnMut(HtmlElement) -> Result<(), JsValue>>);
    set_hook(&hooks, "update", update.into_js_value())?;

    Ok(hooks)
}

/// Register the element.
///
/// `tag_name` defaults to `source-code`. `css` is the complete stylesheet
/// (theme and syntax colours) placed in every instance's shadow root; without
/// it only structural styles are applied. Returns `false` if the tag name was
/// already defined.
#[wasm_bindgen]
pub fn define(tag_name: Option<String>, css: Option<String>) -> Result<bool, JsValue> {
    let tag_name = tag_name.unwrap_or_else(|| DEFAULT_TAG_NAME.to_string());
    let css = css.unwrap_or_else(|| BASE_CSS.to_string());

    let observed: js_sys::Array = observed_attributes()
        .into_iter()
        .map(JsValue::from_str)
        .collect();
    let hooks = build_hooks(css)?;

    let defined = define_code_block(&tag_name, &observed, &hooks)?;
    if defined {
        tracing::info!(tag = %tag_name, "custom element defined");
    } else {
        tracing::warn!(tag = %tag_name, "custom element already defined, skipping");
    }
    Ok(defined)
}
