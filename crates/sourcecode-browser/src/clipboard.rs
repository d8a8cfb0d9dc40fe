//! Copy button behavior.
//!
//! The clipboard write is fire-and-forget: it may be rejected (insecure
//! context, missing permission) and the feedback callback runs either way.

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsValue;
use web_sys::HtmlElement;

use crate::dom::DomRefs;
use crate::error::DomError;

const COPIED_LABEL: &str = "Copied";
const FEEDBACK_MS: u32 = 1000;

/// Feedback shown after the copy button is pressed.
#[derive(Debug, Clone, Default)]
pub enum CopyCallback {
    /// Relabel the button for a second.
    #[default]
    Default,
    /// `fn(domRefs)` where `domRefs` has `host`, `display`, `table`, `edit`
    /// and `copy`.
    Js(js_sys::Function),
}

impl CopyCallback {
    pub fn run(&self, host: &HtmlElement, dom: &DomRefs) -> Result<(), DomError> {
        match self {
            CopyCallback::Default => {
                default_feedback(&dom.copy);
                Ok(())
            }
            CopyCallback::Js(function) => {
                function.call1(&JsValue::NULL, &dom.to_js(host)?)?;
                Ok(())
            }
        }
    }
}

/// Write text through the async Clipboard API. Failures are logged and
/// otherwise ignored.
pub fn write_text(text: String) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = write_text_async(&text).await {
            tracing::debug!("Clipboard write failed: {:?}", e);
        }
    });
}

async fn write_text_async(text: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let clipboard = window.navigator().clipboard();
    // Absent outside secure contexts.
    if clipboard.is_undefined() {
        return Err(JsValue::from_str("clipboard API unavailable"));
    }
    wasm_bindgen_futures::JsFuture::from(clipboard.write_text(text)).await?;
    tracing::debug!("Wrote {} bytes to clipboard", text.len());
    Ok(())
}

/// Show "Copied" on the button with the `active` class and pointer events
/// off, then restore it.
pub fn default_feedback(button: &HtmlElement) {
    let label = button.text_content();
    set_feedback(button, true);
    button.set_text_content(Some(COPIED_LABEL));

    let button = button.clone();
    wasm_bindgen_futures::spawn_local(async move {
        TimeoutFuture::new(FEEDBACK_MS).await;
        set_feedback(&button, false);
        button.set_text_content(label.as_deref());
    });
}

fn set_feedback(button: &HtmlElement, active: bool) {
    let pointer_events = if active { "none" } else { "auto" };
    if let Err(e) = button.style().set_property("pointer-events", pointer_events) {
        tracing::warn!("failed to set copy button pointer events: {:?}", e);
    }
    let classes = button.class_list();
    let result = if active {
        classes.add_1("active")
    } else {
        classes.remove_1("active")
    };
    if let Err(e) = result {
        tracing::warn!("failed to toggle copy button class: {:?}", e);
    }
}
