//! Shadow DOM construction and node lookup.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, ShadowRoot, ShadowRootInit, ShadowRootMode};

use sourcecode_core::{StylesheetSource, classify_stylesheet};

use crate::error::DomError;

/// Shadow root content for every instance. The display table shows the
/// highlighted rows; the edit region sits on top of it holding plain text.
pub const TEMPLATE: &str = concat!(
    r#"<div class="display"><table></table></div>"#,
    r#"<div class="edit"><div class="edit-in" spellcheck="false" data-nosnippet></div></div>"#,
    r#"<button class="copy" type="button">Copy</button>"#,
);

/// Structural styles for the shadow root: overlays the edit region on the
/// code column and toggles the copy button and scrolling from host
/// attributes. Themes go on top of this.
pub const BASE_CSS: &str = include_str!("../assets/source-code.css");

/// Horizontal padding of `.line-number` in `BASE_CSS`, used when the gutter
/// can't be measured.
pub const GUTTER_PADDING: &str = "1.25em";

/// Nodes inside an instance's shadow root.
#[derive(Debug, Clone)]
pub struct DomRefs {
    pub shadow: ShadowRoot,
    pub display: HtmlElement,
    pub table: Element,
    /// Wrapper around the edit region; clicks on its empty area focus it.
    pub edit_wrapper: HtmlElement,
    /// The `contenteditable` region.
    pub edit: HtmlElement,
    pub copy: HtmlElement,
}

pub fn document() -> Result<Document, DomError> {
    web_sys::window()
        .ok_or(DomError::NoWindow)?
        .document()
        .ok_or(DomError::NoDocument)
}

/// Build a shareable stylesheet node from an href or a block of CSS rules.
pub fn stylesheet_element(source: &str) -> Result<Element, DomError> {
    let document = document()?;
    match classify_stylesheet(source) {
        StylesheetSource::Href(href) => {
            let link = document.create_element("link")?;
            link.set_attribute("rel", "stylesheet")?;
            link.set_attribute("href", href)?;
            Ok(link)
        }
        StylesheetSource::Rules(rules) => {
            let style = document.create_element("style")?;
            style.set_text_content(Some(rules));
            Ok(style)
        }
    }
}

fn query<T: JsCast>(shadow: &ShadowRoot, selector: &'static str) -> Result<T, DomError> {
    shadow
        .query_selector(selector)?
        .and_then(|el| el.dyn_into::<T>().ok())
        .ok_or(DomError::MissingNode(selector))
}

impl DomRefs {
    /// Attach an open shadow root to `host` and fill it from the template
    /// plus the element's stylesheet.
    pub fn build(host: &HtmlElement, css: &str) -> Result<Self, DomError> {
        let init = ShadowRootInit::new(ShadowRootMode::Open);
        let shadow = host.attach_shadow(&init)?;
        shadow.set_inner_html(TEMPLATE);

        if !css.is_empty() {
            let style = document()?.create_element("style")?;
            style.set_text_content(Some(css));
            shadow.append_child(&style)?;
        }

        Ok(Self {
            display: query(&shadow, ".display")?,
            table: query(&shadow, ".display table")?,
            edit_wrapper: query(&shadow, ".edit")?,
            edit: query(&shadow, ".edit-in")?,
            copy: query(&shadow, ".copy")?,
            shadow,
        })
    }

    /// Append a copy of a shared stylesheet node.
    pub fn add_stylesheet(&self, stylesheet: &Element) -> Result<(), DomError> {
        let copy = stylesheet.clone_node_with_deep(true)?;
        self.shadow.append_child(&copy)?;
        Ok(())
    }

    /// The refs as a plain object for user copy handlers.
    pub fn to_js(&self, host: &HtmlElement) -> Result<JsValue, DomError> {
        let refs = js_sys::Object::new();
        let entries: [(&str, &JsValue); 5] = [
            ("host", host.as_ref()),
            ("display", self.display.as_ref()),
            ("table", self.table.as_ref()),
            ("edit", self.edit.as_ref()),
            ("copy", self.copy.as_ref()),
        ];
        for (key, value) in entries {
            js_sys::Reflect::set(&refs, &JsValue::from_str(key), value)?;
        }
        Ok(refs.into())
    }
}
