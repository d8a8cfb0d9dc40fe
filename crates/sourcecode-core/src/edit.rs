//! Converting between canonical code and the edit region's markup.
//!
//! Browsers disagree on what typing into a `contenteditable` produces. Chrome
//! leaves the first line as a bare text node and wraps the rest in `<div>`s,
//! Firefox uses `<br>`, and empty lines come out as `<div><br></div>`. The
//! scanner below accepts all of these.

use crate::entities::{decode_entities, escape_html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    /// Lowercased tag name and whether it was a closing tag.
    Tag { name: &'a str, closing: bool },
}

/// Split markup into text runs and tags. Comments and doctypes are dropped.
fn tokenize(html: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = html;

    while !rest.is_empty() {
        let Some(open) = rest.find('<') else {
            tokens.push(Token::Text(rest));
            break;
        };
        if open > 0 {
            tokens.push(Token::Text(&rest[..open]));
        }
        rest = &rest[open..];

        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
            continue;
        }

        let Some(close) = rest.find('>') else {
            // Dangling `<` with no end; innerHTML never produces this.
            tokens.push(Token::Text(rest));
            break;
        };
        let inner = &rest[1..close];
        rest = &rest[close + 1..];

        let (closing, inner) = match inner.strip_prefix('/') {
            Some(stripped) => (true, stripped),
            None => (false, inner),
        };
        let inner = inner.trim_start();
        let name_len = inner
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(inner.len());
        let name = &inner[..name_len];
        if !name.is_empty() {
            tokens.push(Token::Tag { name, closing });
        }
    }

    tokens
}

fn is_block(name: &str) -> bool {
    name.eq_ignore_ascii_case("div") || name.eq_ignore_ascii_case("p")
}

fn line_has_content(out: &str) -> bool {
    !out.is_empty() && !out.ends_with('\n')
}

/// Reconstruct canonical code from the edit region's `innerHTML`.
pub fn code_from_edit_html(html: &str) -> String {
    let mut code = String::with_capacity(html.len());

    for token in tokenize(html) {
        match token {
            Token::Text(text) => {
                let decoded = decode_entities(text);
                code.extend(decoded.chars().map(|c| if c == '\u{00A0}' { ' ' } else { c }));
            }
            Token::Tag { name, .. } if name.eq_ignore_ascii_case("br") => code.push('\n'),
            // Opening a block starts a new line unless one was just started;
            // closing one ends the line unless a `<br>` already did.
            Token::Tag { name, .. } if is_block(name) => {
                if line_has_content(&code) {
                    code.push('\n');
                }
            }
            Token::Tag { .. } => {}
        }
    }

    if code.ends_with('\n') {
        code.pop();
    }
    code
}

/// Markup for the edit region holding `code`, one `<div>` per line.
pub fn edit_html_from_code(code: &str) -> String {
    code.split('\n')
        .map(|line| {
            if line.is_empty() {
                "<div><br></div>".to_string()
            } else {
                format!("<div>{}</div>", escape_html(line))
            }
        })
        .collect()
}

/// Text the Tab key inserts at the caret.
pub fn tab_insertion(tab_size: usize) -> String {
    " ".repeat(tab_size.max(1))
}
