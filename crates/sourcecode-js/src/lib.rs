//! WASM bindings for the `<source-code>` custom element.
//!
//! Registers the element and exposes the static configuration surface
//! (`on`, `config`, `globalAttrs`, `addStylesheet`) to JavaScript.
//!
//! # Features
//!
//! - `syntax-highlighting`: Bundle syntect grammars and expose
//!   `useBuiltinHighlighter()`

mod api;
mod element;
mod types;

pub use api::*;
pub use element::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Install the panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let reg = Registry::default().with(wasm_layer);

    let _ = set_global_default(reg);
}
