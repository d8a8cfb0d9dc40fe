//! Process-wide state shared by every instance.
//!
//! Lives in a thread-local and is only touched from the UI thread. Callers
//! get clones out of it; no borrow is held while user callbacks or renders
//! run, so those are free to call back into the registry.
//!
//! Instances are held weakly. Each one is owned by its host element (see
//! `CodeBlockHandle`), and dead entries are pruned on every lookup.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smol_str::SmolStr;
use sourcecode_core::{ComponentConfig, GlobalAttributes};
use wasm_bindgen::JsValue;
use web_sys::{Element, HtmlElement};

use crate::clipboard::CopyCallback;
use crate::component::CodeBlock;
use crate::highlight::HighlightCallback;

#[derive(Default)]
struct Registry {
    config: ComponentConfig,
    globals: GlobalAttributes,
    highlight: HighlightCallback,
    copy: CopyCallback,
    stylesheets: Vec<Element>,
    instances: Vec<Weak<CodeBlock>>,
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::default());
}

fn with<R>(f: impl FnOnce(&mut Registry) -> R) -> R {
    REGISTRY.with(|registry| f(&mut registry.borrow_mut()))
}

impl Registry {
    /// Drop entries whose instance is gone and return the rest.
    fn live_instances(&mut self) -> Vec<Rc<CodeBlock>> {
        self.instances.retain(|block| block.strong_count() > 0);
        self.instances.iter().filter_map(Weak::upgrade).collect()
    }
}

pub fn config() -> ComponentConfig {
    with(|r| r.config.clone())
}

pub fn globals() -> GlobalAttributes {
    with(|r| r.globals.clone())
}

pub fn highlight_callback() -> HighlightCallback {
    with(|r| r.highlight.clone())
}

pub fn copy_callback() -> CopyCallback {
    with(|r| r.copy.clone())
}

pub fn stylesheets() -> Vec<Element> {
    with(|r| r.stylesheets.clone())
}

/// Track a new instance without taking ownership of it.
pub fn register(block: &Rc<CodeBlock>) {
    with(|r| r.instances.push(Rc::downgrade(block)));
}

/// Instance whose host is `host`.
pub fn find(host: &HtmlElement) -> Option<Rc<CodeBlock>> {
    with(|r| r.live_instances())
        .into_iter()
        .find(|block| block.host() == host)
}

/// Number of live instances.
pub fn instance_count() -> usize {
    with(|r| r.live_instances().len())
}

/// Re-render every connected instance with its current code.
pub fn render_all() -> Result<(), JsValue> {
    let instances = with(|r| r.live_instances());
    tracing::debug!(instances = instances.len(), "re-rendering all code blocks");
    for block in instances.iter().filter(|block| block.is_connected()) {
        block.update()?;
    }
    Ok(())
}

/// Install the highlight callback and re-render.
pub fn set_highlight_callback(callback: HighlightCallback) -> Result<(), JsValue> {
    with(|r| r.highlight = callback);
    render_all()
}

/// Install the copy feedback callback. Nothing visible changes until the
/// next copy, so there is no re-render.
pub fn set_copy_callback(callback: CopyCallback) {
    with(|r| r.copy = callback);
}

/// Change the shared configuration and re-render.
pub fn configure(update: impl FnOnce(&mut ComponentConfig)) -> Result<(), JsValue> {
    with(|r| update(&mut r.config));
    render_all()
}

/// Drop every forced attribute value and re-render.
pub fn clear_global_attributes() -> Result<(), JsValue> {
    with(|r| r.globals.clear());
    render_all()
}

/// Merge forced attribute values and re-render.
pub fn set_global_attributes(
    overrides: impl IntoIterator<Item = (SmolStr, bool)>,
) -> Result<(), JsValue> {
    with(|r| r.globals.merge(overrides));
    render_all()
}

/// Share a stylesheet node with every existing and future instance.
pub fn add_stylesheet(stylesheet: Element) {
    let instances = with(|r| {
        r.stylesheets.push(stylesheet.clone());
        r.live_instances()
    });
    for block in instances {
        if let Err(e) = block.dom().add_stylesheet(&stylesheet) {
            tracing::warn!("failed to add stylesheet to instance: {e}");
        }
    }
}
