//! Browser DOM layer for the `<source-code>` element.
//!
//! This crate owns everything that touches the DOM: the shadow root, the
//! instance lifecycle, event listeners, timers and the process-wide
//! registry. It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `component`: one `CodeBlock` per element instance
//! - `element`: lifecycle entry points called from the element class
//! - `registry`: shared config, callbacks, stylesheets and instances
//! - `dom`: shadow template and node lookup
//! - `clipboard`: copy action and feedback
//! - `style`: temporary inline style overrides
//!
//! # Re-exports
//!
//! This crate re-exports `sourcecode-core` for convenience, so consumers
//! only need to depend on `sourcecode-browser`.

// Re-export core crate
pub use sourcecode_core;
pub use sourcecode_core::*;

pub mod clipboard;
pub mod component;
pub mod dom;
pub mod element;
pub mod error;
pub mod highlight;
pub mod registry;
pub mod style;

pub use clipboard::CopyCallback;
pub use component::{CodeBlock, CodeBlockHandle, INSTANCE_PROPERTY};
pub use dom::{BASE_CSS, DomRefs, TEMPLATE};
pub use error::DomError;
pub use highlight::HighlightCallback;
