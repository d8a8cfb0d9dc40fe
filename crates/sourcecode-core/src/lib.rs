//! sourcecode-core: Framework-free logic for the `<source-code>` element.
//!
//! This crate provides:
//! - `normalize` - raw element content to canonical code
//! - `render_code` - code to self-contained table rows via a `Highlighter`
//! - `TagStack` - keeps highlighter markup well-formed per line
//! - `TypingSimulator` - the typing animation state machine
//! - `code_from_edit_html` - contenteditable markup back to code
//! - Attribute parsing, dispatch and configuration shared by every instance

pub mod attrs;
pub mod config;
pub mod edit;
pub mod entities;
pub mod error;
pub mod lines;
pub mod normalize;
pub mod render;
#[cfg(feature = "syntax-highlighting")]
pub mod syntax;
pub mod tags;
pub mod typing;

pub use attrs::{
    Attribute, AttributeAction, DEFAULT_SPEED, StylesheetSource, classify_stylesheet, dispatch,
    max_height_css, observed_attributes, parse_max_height, parse_speed, speed_or_default,
};
pub use config::{ComponentConfig, DEFAULT_TAG_NAME, GlobalAttributes, resolve_attribute};
pub use edit::{code_from_edit_html, edit_html_from_code, tab_insertion};
pub use entities::{decode_entities, escape_html};
pub use error::AttributeError;
pub use lines::{LineInstruction, highlighted_lines};
pub use normalize::{dedent_lines, normalize};
pub use render::{
    EscapeHighlighter, Highlighter, RenderOptions, RenderedCode, RenderedLine, render_code,
};
pub use smol_str::SmolStr;
#[cfg(feature = "syntax-highlighting")]
pub use syntax::{CSS_PREFIX, SyntectHighlighter};
pub use tags::{ScannedTag, TagKind, TagStack, scan_tags, strip_tags};
pub use typing::{TypingSimulator, TypingState, TypingStep};
