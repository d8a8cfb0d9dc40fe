//! One `<source-code>` instance.
//!
//! `CodeBlock` owns the shadow DOM and the canonical code. Immutable parts
//! (host, DOM refs) live directly on the struct; everything that changes is
//! behind a `RefCell` that is never held across a render, a user callback or
//! an await.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::future::TimeoutFuture;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sourcecode_core::{
    Attribute, AttributeAction, ComponentConfig, RenderOptions, RenderedCode, TypingSimulator,
    TypingState, code_from_edit_html, dispatch, edit_html_from_code, max_height_css, normalize,
    parse_max_height, render_code, resolve_attribute, speed_or_default, tab_insertion,
};
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit, HtmlDocument, HtmlElement, KeyboardEvent};

use crate::clipboard;
use crate::dom::{self, DomRefs, GUTTER_PADDING};
use crate::error::DomError;
use crate::registry;
use crate::style::StyleRecovery;

const VISIBILITY: &str = "visibility";
const USER_SELECT: &str = "user-select";
const GUTTER_VAR: &str = "--line-number-offset";

/// Host property holding the [`CodeBlockHandle`] that owns the instance.
pub const INSTANCE_PROPERTY: &str = "__sourceCode";

/// Strong reference to an instance, stored on its host element. The
/// registry only holds weak references, so an instance is dropped once its
/// handle is freed.
#[wasm_bindgen]
pub struct CodeBlockHandle {
    _block: Rc<CodeBlock>,
}

#[derive(Debug, Default)]
struct BlockState {
    /// Canonical code; `None` until initialization.
    code: Option<String>,
    typing: TypingState,
    initialized: bool,
    /// Typing was cut short by a disconnect; finish on reconnect.
    interrupted: bool,
    style: StyleRecovery,
}

pub struct CodeBlock {
    host: HtmlElement,
    dom: DomRefs,
    state: RefCell<BlockState>,
    connected: Cell<bool>,
    /// Set while `copy`/`scroll` are written back to the host so those
    /// writes don't re-enter the attribute handler.
    reconciling: Cell<bool>,
    /// Canonical names that reconciliation added on its own. They are not
    /// read back when resolving, so removing an alias turns the feature off.
    reconciled: RefCell<Vec<&'static str>>,
    max_height_applied: Cell<bool>,
    listeners: RefCell<Vec<EventListener>>,
}

impl CodeBlock {
    /// Build the shadow DOM for `host` and register the instance.
    pub fn new(host: HtmlElement, css: &str) -> Result<Rc<Self>, DomError> {
        let dom = DomRefs::build(&host, css)?;
        for stylesheet in registry::stylesheets() {
            dom.add_stylesheet(&stylesheet)?;
        }

        let block = Rc::new(Self {
            host,
            dom,
            state: RefCell::new(BlockState::default()),
            connected: Cell::new(false),
            reconciling: Cell::new(false),
            reconciled: RefCell::new(Vec::new()),
            max_height_applied: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
        });
        block.attach_listeners();

        let handle = JsValue::from(CodeBlockHandle {
            _block: block.clone(),
        });
        js_sys::Reflect::set(&block.host, &JsValue::from_str(INSTANCE_PROPERTY), &handle)?;
        registry::register(&block);
        tracing::debug!("code block constructed");
        Ok(block)
    }

    pub fn host(&self) -> &HtmlElement {
        &self.host
    }

    pub fn dom(&self) -> &DomRefs {
        &self.dom
    }

    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    /// Last canonical code, if the block has been initialized.
    pub fn code(&self) -> Option<String> {
        self.state.borrow().code.clone()
    }

    pub fn typing_state(&self) -> TypingState {
        self.state.borrow().typing
    }

    /// Resolved attribute value, global overrides applied.
    fn attribute(&self, attribute: Attribute) -> Option<String> {
        let globals = registry::globals();
        let reconciled = self.reconciled.borrow();
        resolve_attribute(&globals, attribute, |name| {
            if reconciled.iter().any(|written| *written == name) {
                return None;
            }
            self.host.get_attribute(name)
        })
        .map(|value| value.into_owned())
    }

    // === Lifecycle ===

    pub fn connected(self: &Rc<Self>) {
        self.connected.set(true);
        self.apply_max_height();

        let (first, interrupted) = {
            let mut state = self.state.borrow_mut();
            let first = !std::mem::replace(&mut state.initialized, true);
            (first, std::mem::take(&mut state.interrupted))
        };

        if first {
            tracing::debug!("code block connected, deferring initialization");
            self.suppress_style(VISIBILITY, "hidden");
            self.suppress_style(USER_SELECT, "none");

            // Light-DOM children are parsed after the element connects.
            let weak = Rc::downgrade(self);
            wasm_bindgen_futures::spawn_local(async move {
                TimeoutFuture::new(0).await;
                let Some(block) = weak.upgrade() else {
                    return;
                };
                if let Err(e) = block.initialize() {
                    tracing::error!("code block initialization failed: {:?}", e);
                }
            });
        } else if interrupted {
            tracing::debug!("code block reconnected, finishing interrupted typing");
            if let Some(code) = self.code() {
                if let Err(e) = self.show_code(&code) {
                    tracing::error!("render after reconnect failed: {:?}", e);
                }
            }
        } else {
            // Re-renders while detached were skipped.
            tracing::debug!("code block reconnected");
            if let Err(e) = self.update() {
                tracing::error!("render after reconnect failed: {:?}", e);
            }
        }
    }

    pub fn disconnected(&self) {
        self.connected.set(false);
    }

    /// Normalize the authored content and either type it or show it.
    fn initialize(self: &Rc<Self>) -> Result<(), JsValue> {
        let config = registry::config();

        // A `code` assignment before initialization wins over the markup.
        let code = match self.code() {
            Some(code) => code,
            None => {
                let code = normalize(&self.host.inner_html(), config.effective_tab_size());
                self.host.set_inner_html("");
                code
            }
        };
        tracing::debug!(lines = code.split('\n').count(), "code block initialized");

        let result = match self.attribute(Attribute::Type) {
            Some(speed) => {
                self.start_typing(code, speed_or_default(&speed), &config);
                Ok(())
            }
            None => self.show_code(&code),
        };
        self.recover_style(VISIBILITY);
        result
    }

    pub fn attribute_changed(
        &self,
        name: &str,
        old: Option<String>,
        new: Option<String>,
    ) -> Result<(), JsValue> {
        if self.reconciling.get() {
            return Ok(());
        }
        // Any outside write makes the attribute the author's again.
        self.reconciled.borrow_mut().retain(|written| *written != name);
        if old == new {
            return Ok(());
        }
        let typing = self.typing_state();
        if typing == TypingState::Typing {
            tracing::debug!(attribute = name, "ignoring attribute change while typing");
            return Ok(());
        }

        match dispatch(name) {
            AttributeAction::Rerender => self.update(),
            AttributeAction::ApplyEditable => {
                if typing == TypingState::Done {
                    self.apply_editable();
                }
                Ok(())
            }
            AttributeAction::ApplyMaxHeight => {
                self.apply_max_height();
                Ok(())
            }
            AttributeAction::Ignore => Ok(()),
        }
    }

    // === Rendering ===

    /// Re-render the current code and re-apply `editable`.
    pub fn update(&self) -> Result<(), JsValue> {
        match self.typing_state() {
            TypingState::Typing => return Ok(()),
            TypingState::Done => self.apply_editable(),
            TypingState::Idle => {}
        }
        match self.code() {
            Some(code) => self.render_rows(&code),
            None => Ok(()),
        }
    }

    /// Replace the code: render it and mirror it into the edit region.
    pub fn set_code(&self, code: &str) -> Result<(), JsValue> {
        if self.typing_state() == TypingState::Typing {
            tracing::debug!("ignoring code assignment while typing");
            return Ok(());
        }
        self.render(code)?;
        self.dom.edit.set_inner_html(&edit_html_from_code(code));
        Ok(())
    }

    /// Store `code` as the canonical code and render it.
    pub fn render(&self, code: &str) -> Result<(), JsValue> {
        self.state.borrow_mut().code = Some(code.to_string());
        self.render_rows(code)
    }

    /// Render rows for `code` without storing it.
    fn render_rows(&self, code: &str) -> Result<(), JsValue> {
        let callback = registry::highlight_callback();
        let language = self.attribute(Attribute::Language);
        let highlight = self.attribute(Attribute::Highlight);

        let rendered = render_code(
            code,
            RenderOptions {
                language: language.as_deref(),
                highlight: highlight.as_deref(),
            },
            &callback.for_host(&self.host),
        )?;

        self.dom.table.set_inner_html(&rendered.to_table_html());
        self.update_gutter(&rendered);
        self.reconcile_attributes();
        Ok(())
    }

    /// Expose the widest line number's width for the edit region's offset.
    fn update_gutter(&self, rendered: &RenderedCode) {
        let width = self
            .dom
            .table
            .query_selector("tr:last-of-type td:first-child")
            .ok()
            .flatten()
            .and_then(|cell| cell.dyn_into::<HtmlElement>().ok())
            .map(|cell| cell.offset_width())
            .unwrap_or(0);
        // Detached or not yet laid out: fall back to a character count.
        let value = if width > 0 {
            format!("{width}px")
        } else {
            format!("calc({}ch + {GUTTER_PADDING})", rendered.gutter_chars())
        };
        if let Err(e) = self.dom.edit.style().set_property(GUTTER_VAR, &value) {
            tracing::warn!("failed to set gutter offset: {:?}", e);
        }
    }

    /// Write `copy` and `scroll` back to the host as plain boolean
    /// attributes so stylesheets can select on them.
    fn reconcile_attributes(&self) {
        self.reconciling.set(true);
        for attribute in [Attribute::Copy, Attribute::Scroll] {
            let name = attribute.name();
            let on = self.attribute(attribute).is_some();
            let current = self.host.get_attribute(name);
            let result = if on && current.as_deref() != Some("") {
                if current.is_none() {
                    self.reconciled.borrow_mut().push(name);
                }
                self.host.set_attribute(name, "")
            } else if !on && current.is_some() {
                self.reconciled.borrow_mut().retain(|written| *written != name);
                self.host.remove_attribute(name)
            } else {
                Ok(())
            };
            if let Err(e) = result {
                tracing::warn!(attribute = name, "failed to reconcile attribute: {:?}", e);
            }
        }
        self.reconciling.set(false);
    }

    fn apply_editable(&self) {
        let result = if self.attribute(Attribute::Editable).is_some() {
            self.dom.edit.set_attribute("contenteditable", "true")
        } else {
            self.dom.edit.remove_attribute("contenteditable")
        };
        if let Err(e) = result {
            tracing::warn!("failed to toggle contenteditable: {:?}", e);
        }
    }

    fn apply_max_height(&self) {
        let rows = self
            .attribute(Attribute::MaxHeight)
            .and_then(|raw| match parse_max_height(&raw) {
                Ok(rows) => Some(rows),
                Err(e) => {
                    tracing::debug!("{e}");
                    None
                }
            });

        let style = self.host.style();
        let result = match rows {
            Some(rows) => {
                self.max_height_applied.set(true);
                style.set_property("max-height", &max_height_css(rows))
            }
            None if self.max_height_applied.replace(false) => {
                style.remove_property("max-height").map(|_| ())
            }
            None => Ok(()),
        };
        if let Err(e) = result {
            tracing::warn!("failed to apply max height: {:?}", e);
        }
    }

    fn suppress_style(&self, property: &'static str, value: &str) {
        let result = self
            .state
            .borrow_mut()
            .style
            .suppress(&self.host, property, value);
        if let Err(e) = result {
            tracing::warn!(property, "failed to suppress style: {e}");
        }
    }

    fn recover_style(&self, property: &str) {
        let result = self.state.borrow_mut().style.recover(&self.host, property);
        if let Err(e) = result {
            tracing::warn!(property, "failed to recover style: {e}");
        }
    }

    // === Typing ===

    /// Show the full code and leave the typing phase.
    fn show_code(&self, code: &str) -> Result<(), JsValue> {
        let result = self.render(code);
        self.dom.edit.set_inner_html(&edit_html_from_code(code));
        self.finish_typing();
        result
    }

    fn show_partial(&self, partial: &str, padded: &str) -> Result<(), JsValue> {
        self.dom.edit.set_inner_html(&edit_html_from_code(partial));
        self.render_rows(padded)
    }

    fn finish_typing(&self) {
        self.state.borrow_mut().typing = TypingState::Done;
        self.apply_editable();
        self.recover_style(USER_SELECT);
    }

    fn start_typing(self: &Rc<Self>, code: String, speed: f64, config: &ComponentConfig) {
        let mut simulator = TypingSimulator::new(code.clone(), speed, config.effective_tab_size());
        if !simulator.start() {
            return;
        }
        {
            let mut state = self.state.borrow_mut();
            state.code = Some(code);
            state.typing = TypingState::Typing;
        }
        tracing::debug!(speed, "typing started");

        let min_lines = config.on_type_min_lines;
        let weak = Rc::downgrade(self);
        wasm_bindgen_futures::spawn_local(async move {
            let mut rng = SmallRng::seed_from_u64(js_sys::Math::random().to_bits());
            while let Some(step) = simulator.next_step(&mut rng) {
                if step.delay_ms > 0 {
                    TimeoutFuture::new(step.delay_ms).await;
                }
                let Some(block) = weak.upgrade() else {
                    return;
                };
                if !block.is_connected() {
                    block.interrupt_typing();
                    return;
                }
                let padded = simulator.padded_partial(min_lines);
                if let Err(e) = block.show_partial(simulator.partial(), &padded) {
                    tracing::error!("typing step render failed: {:?}", e);
                    break;
                }
            }

            let Some(block) = weak.upgrade() else {
                return;
            };
            if !block.is_connected() {
                block.interrupt_typing();
                return;
            }
            if let Err(e) = block.show_code(simulator.code()) {
                tracing::error!("final render after typing failed: {:?}", e);
            }
            tracing::debug!("typing finished");
        });
    }

    fn interrupt_typing(&self) {
        tracing::debug!("code block detached while typing, stopping");
        let mut state = self.state.borrow_mut();
        state.typing = TypingState::Done;
        state.interrupted = true;
    }

    // === Events ===

    fn attach_listeners(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let mut listeners = Vec::with_capacity(5);

        listeners.push(EventListener::new(&self.dom.edit, "input", {
            let weak = weak.clone();
            move |event| {
                let Some(block) = weak.upgrade() else {
                    return;
                };
                // Replaced by the host's own `input` event below.
                event.stop_propagation();
                block.handle_input();
            }
        }));

        listeners.push(EventListener::new_with_options(
            &self.dom.edit,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if event.key() != "Tab" || event.shift_key() {
                    return;
                }
                event.prevent_default();
                insert_tab();
            },
        ));

        listeners.push(EventListener::new(&self.dom.edit, "blur", {
            let weak = weak.clone();
            move |_| {
                if let Some(block) = weak.upgrade() {
                    let code = block.code().unwrap_or_default();
                    block.dispatch("change", &code);
                }
            }
        }));

        listeners.push(EventListener::new(&self.dom.edit_wrapper, "click", {
            let weak = weak.clone();
            move |event| {
                let Some(block) = weak.upgrade() else {
                    return;
                };
                let wrapper: &web_sys::EventTarget = block.dom.edit_wrapper.as_ref();
                if event.target().as_ref() == Some(wrapper) {
                    if let Err(e) = block.dom.edit.focus() {
                        tracing::warn!("failed to focus edit region: {:?}", e);
                    }
                }
            }
        }));

        listeners.push(EventListener::new(&self.dom.copy, "click", move |_| {
            if let Some(block) = weak.upgrade() {
                block.copy();
            }
        }));

        *self.listeners.borrow_mut() = listeners;
    }

    fn handle_input(&self) {
        let code = code_from_edit_html(&self.dom.edit.inner_html());
        if let Err(e) = self.render(&code) {
            tracing::error!("render after edit failed: {:?}", e);
        }
        self.dispatch("input", &code);
    }

    /// Copy the canonical code and run the feedback callback.
    pub fn copy(&self) {
        clipboard::write_text(self.code().unwrap_or_default());
        if let Err(e) = registry::copy_callback().run(&self.host, &self.dom) {
            tracing::warn!("copy callback failed: {e}");
        }
    }

    fn dispatch(&self, name: &str, code: &str) {
        let init = CustomEventInit::new();
        init.set_detail(&JsValue::from_str(code));
        match CustomEvent::new_with_event_init_dict(name, &init) {
            Ok(event) => {
                if let Err(e) = self.host.dispatch_event(&event) {
                    tracing::warn!(event = name, "event listener threw: {:?}", e);
                }
            }
            Err(e) => tracing::warn!(event = name, "failed to create event: {:?}", e),
        }
    }
}

/// Insert one indentation unit at the caret through the editing engine, so
/// undo history and the `input` event behave as for typed text.
fn insert_tab() {
    let text = tab_insertion(registry::config().effective_tab_size());
    let Some(document) = dom::document()
        .ok()
        .and_then(|document| document.dyn_into::<HtmlDocument>().ok())
    else {
        return;
    };
    if let Err(e) = document.exec_command_with_show_ui_and_value("insertText", false, &text) {
        tracing::warn!("insertText failed: {:?}", e);
    }
}
