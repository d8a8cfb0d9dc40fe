//! Built-in highlighter backed by syntect.
//!
//! Output uses prefixed class names rather than inline colors, so the theme
//! lives entirely in the stylesheet passed to the element. Scopes that span
//! several lines (block comments, strings) come out as one `<span>` across
//! newlines, which the renderer's tag stack splits per row.

use std::sync::LazyLock;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::render::Highlighter;
use crate::tags::strip_tags;

/// Prefix on every generated class, e.g. `sc-keyword`.
pub const CSS_PREFIX: &str = "sc-";

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

#[derive(Debug, Clone, Copy)]
pub struct SyntectHighlighter {
    syntax_set: &'static SyntaxSet,
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self {
            syntax_set: &SYNTAX_SET,
        }
    }
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    fn syntax_for(&self, language: Option<&str>) -> &'static SyntaxReference {
        language
            .and_then(|token| self.syntax_set.find_syntax_by_token(token))
            .unwrap_or_else(|| {
                if let Some(token) = language {
                    tracing::debug!(language = token, "no syntax for language, using plain text");
                }
                self.syntax_set.find_syntax_plain_text()
            })
    }
}

impl Highlighter for SyntectHighlighter {
    type Error = syntect::Error;

    fn highlight(&self, code: &str, language: Option<&str>) -> Result<String, Self::Error> {
        let syntax = self.syntax_for(language);
        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            self.syntax_set,
            ClassStyle::SpacedPrefixed { prefix: CSS_PREFIX },
        );

        // The newline syntaxes expect every line to end in `\n`.
        let terminated = format!("{code}\n");
        for line in LinesWithEndings::from(&terminated) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        let mut html = generator.finalize();

        // Drop the newline added above so the row count matches the code.
        if let Some(last) = html.rfind('\n') {
            if strip_tags(&html[last + 1..]).is_empty() {
                html.remove(last);
            }
        }
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RenderOptions, render_code};

    #[test]
    fn test_rows_match_code_lines() {
        let code = "fn main() {\n    let x = 1;\n}";
        let html = SyntectHighlighter::new()
            .highlight(code, Some("rs"))
            .unwrap();
        assert_eq!(html.split('\n').count(), 3);
        assert!(html.contains("sc-"));
    }

    #[test]
    fn test_multiline_comment_is_balanced() {
        let code = "/* one\n   two */\nlet a = 1;";
        let rendered = render_code(
            code,
            RenderOptions {
                language: Some("rs"),
                ..Default::default()
            },
            &SyntectHighlighter::new(),
        )
        .unwrap();
        assert_eq!(rendered.len(), 3);
        let text: Vec<String> = rendered.lines.iter().map(|l| strip_tags(&l.html)).collect();
        assert_eq!(text.join("\n"), code);
        for line in &rendered.lines {
            let opens = line.html.matches("<span").count();
            let closes = line.html.matches("</span>").count();
            assert_eq!(opens, closes, "unbalanced row {:?}", line.html);
        }
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let html = SyntectHighlighter::new()
            .highlight("a < b", Some("not-a-language"))
            .unwrap();
        assert!(html.contains("&lt;"));
    }
}
