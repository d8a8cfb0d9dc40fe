//! Tag scanning and the per-line tag stack.
//!
//! Highlighters emit markup that freely spans newlines (a block comment is
//! usually one `<span>` across many lines). Rows are rendered independently,
//! so each row has to reopen whatever is still open from the previous row and
//! close whatever it leaves open itself.

use std::sync::LazyLock;

use regex_lite::Regex;
use smol_str::{SmolStr, ToSmolStr};

/// Tolerant HTML tag pattern: opening tags with optional attributes (quoted
/// or bare values), optional self-close slash, and closing tags.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"<([a-zA-Z][a-zA-Z0-9-]*)"#,
        r#"(?:\s+[a-zA-Z_:][a-zA-Z0-9_:.-]*(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`/]+))?)*"#,
        r#"\s*(/)?\s*>"#,
        r#"|</([a-zA-Z][a-zA-Z0-9-]*)\s*>"#,
    ))
    .expect("tag pattern is valid")
});

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// What kind of tag a scanned match is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<span class="x">`
    Open,
    /// `</span>`
    Close,
    /// `<br/>`, `<img src="...">` and other tags that never enclose content.
    SelfClosing,
}

/// A tag found in a line of highlighter output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedTag<'a> {
    /// Lowercased tag name.
    pub name: SmolStr,
    /// The markup exactly as written.
    pub raw: &'a str,
    pub kind: TagKind,
}

impl ScannedTag<'_> {
    pub fn is_close(&self) -> bool {
        self.kind == TagKind::Close
    }
}

/// Find every tag-like substring in `line`, in order.
pub fn scan_tags(line: &str) -> Vec<ScannedTag<'_>> {
    TAG_PATTERN
        .captures_iter(line)
        .filter_map(|caps| {
            let raw = caps.get(0)?.as_str();
            if let Some(name) = caps.get(3) {
                return Some(ScannedTag {
                    name: name.as_str().to_ascii_lowercase().to_smolstr(),
                    raw,
                    kind: TagKind::Close,
                });
            }
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let kind = if caps.get(2).is_some() || VOID_ELEMENTS.contains(&name.as_str()) {
                TagKind::SelfClosing
            } else {
                TagKind::Open
            };
            Some(ScannedTag {
                name: name.to_smolstr(),
                raw,
                kind,
            })
        })
        .collect()
}

/// Text content of a line of markup with every tag removed.
pub fn strip_tags(line: &str) -> String {
    TAG_PATTERN.replace_all(line, "").into_owned()
}

/// A tag still open at the end of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag {
    pub name: SmolStr,
    /// Original opening markup, replayed at the start of following lines.
    pub markup: String,
}

/// Stack of tags opened on earlier lines and not yet closed.
#[derive(Debug, Clone, Default)]
pub struct TagStack {
    open: Vec<OpenTag>,
}

impl TagStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// Open tags from outermost to innermost.
    pub fn iter(&self) -> impl Iterator<Item = &OpenTag> {
        self.open.iter()
    }

    /// Feed one scanned tag.
    ///
    /// Close tags only pop when they match the innermost open tag; anything
    /// else is a highlighter mistake and is ignored.
    pub fn apply(&mut self, tag: &ScannedTag<'_>) {
        match tag.kind {
            TagKind::Open => self.open.push(OpenTag {
                name: tag.name.clone(),
                markup: tag.raw.to_string(),
            }),
            TagKind::Close => {
                if self.open.last().is_some_and(|top| top.name == tag.name) {
                    self.open.pop();
                } else {
                    tracing::trace!(tag = %tag.name, "unmatched closing tag ignored");
                }
            }
            TagKind::SelfClosing => {}
        }
    }

    /// Markup reopening every tag on the stack, outermost first.
    pub fn reopen_markup(&self) -> String {
        self.open.iter().map(|tag| tag.markup.as_str()).collect()
    }

    /// Markup closing every tag on the stack, innermost first.
    pub fn close_markup(&self) -> String {
        self.open
            .iter()
            .rev()
            .map(|tag| format!("</{}>", tag.name))
            .collect()
    }

    /// Turn one line of highlighter output into self-contained markup and
    /// advance the stack past it.
    pub fn balance_line(&mut self, line: &str) -> String {
        let mut html = self.reopen_markup();
        html.push_str(line);
        for tag in scan_tags(line) {
            self.apply(&tag);
        }
        html.push_str(&self.close_markup());
        html
    }
}
