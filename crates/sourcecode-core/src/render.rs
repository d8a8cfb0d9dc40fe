//! Code string to line rows.
//!
//! The renderer never touches the DOM. It runs the highlighter, splits the
//! output into rows that are each well-formed on their own, and marks rows
//! named by the `highlight` attribute. The browser layer turns the result
//! into table markup and measures the gutter.

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt::Write as _;

use crate::entities::escape_html;
use crate::lines::highlighted_lines;
use crate::tags::TagStack;

/// Turns a code string into HTML, possibly with markup spanning lines.
///
/// Errors are not caught by the renderer; they reach whoever asked for the
/// render.
pub trait Highlighter {
    type Error;

    fn highlight(&self, code: &str, language: Option<&str>) -> Result<String, Self::Error>;
}

/// Default highlighter: HTML-escape and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapeHighlighter;

impl Highlighter for EscapeHighlighter {
    type Error = Infallible;

    fn highlight(&self, code: &str, _language: Option<&str>) -> Result<String, Self::Error> {
        Ok(escape_html(code))
    }
}

impl<F, E> Highlighter for F
where
    F: Fn(&str, Option<&str>) -> Result<String, E>,
{
    type Error = E;

    fn highlight(&self, code: &str, language: Option<&str>) -> Result<String, Self::Error> {
        self(code, language)
    }
}

/// Inputs that affect a render besides the code itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions<'a> {
    /// Language passed through to the highlighter. Empty means none.
    pub language: Option<&'a str>,
    /// Raw `highlight` attribute value.
    pub highlight: Option<&'a str>,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// 1-based line number shown in the gutter.
    pub number: usize,
    /// Self-contained markup for the code cell.
    pub html: String,
    pub highlighted: bool,
}

/// Every row of a rendered block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedCode {
    pub lines: Vec<RenderedLine>,
}

impl RenderedCode {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Width of the widest line number, in characters.
    pub fn gutter_chars(&self) -> usize {
        self.lines
            .last()
            .map(|line| line.number.to_string().len())
            .unwrap_or(0)
    }

    /// Rows as `<tr>` markup, one per line.
    pub fn to_table_html(&self) -> String {
        let mut html = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                html.push('\n');
            }
            let class = if line.highlighted {
                r#" class="highlighted""#
            } else {
                ""
            };
            // Writing into a String cannot fail.
            let _ = write!(
                html,
                r#"<tr{class}><td class="line-number"><span>{}</span></td><td class="line-code"><pre>{}</pre></td></tr>"#,
                line.number, line.html
            );
        }
        html
    }
}

/// Render `code` into rows.
///
/// Empty code renders no rows and never reaches the highlighter.
pub fn render_code<H>(
    code: &str,
    options: RenderOptions<'_>,
    highlighter: &H,
) -> Result<RenderedCode, H::Error>
where
    H: Highlighter + ?Sized,
{
    if code.is_empty() {
        return Ok(RenderedCode::default());
    }

    let language = options.language.filter(|language| !language.is_empty());
    let highlighted = highlighter.highlight(code, language)?;

    let line_count = highlighted.split('\n').count();
    let marked: BTreeSet<usize> = options
        .highlight
        .map(|value| highlighted_lines(value, line_count))
        .unwrap_or_default();

    let mut stack = TagStack::new();
    let lines: Vec<RenderedLine> = highlighted
        .split('\n')
        .enumerate()
        .map(|(i, line)| RenderedLine {
            number: i + 1,
            html: stack.balance_line(line),
            highlighted: marked.contains(&(i + 1)),
        })
        .collect();

    if !stack.is_empty() {
        tracing::trace!(open = stack.len(), "highlighter left tags open at end of code");
    }
    tracing::debug!(rows = lines.len(), language, "rendered code block");

    Ok(RenderedCode { lines })
}
