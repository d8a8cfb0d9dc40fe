//! Turning the raw markup an element was authored with into canonical code.
//!
//! Authors indent the element's content to match the surrounding document,
//! so the first job is to undo that: trim blank edge lines, expand tabs and
//! strip the shared indentation. Entities are then decoded once and the
//! remaining indentation is rescaled to the configured tab width.

use std::borrow::Cow;

use crate::entities::decode_entities;

/// Produce the canonical code string for a block's raw content.
pub fn normalize(raw: &str, tab_size: usize) -> String {
    let raw = raw.replace("\r\n", "\n");
    let lines: Vec<Cow<'_, str>> = trim_blank_edges(raw.split('\n').collect())
        .into_iter()
        .map(|line| expand_leading_tabs(line, tab_size))
        .collect();
    if lines.is_empty() {
        return String::new();
    }

    let borrowed: Vec<&str> = lines.iter().map(|line| line.as_ref()).collect();
    let dedented = dedent_lines(&borrowed).join("\n");
    reindent(&decode_entities(&dedented), tab_size)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Drop whitespace-only lines from both ends, keeping interior ones.
fn trim_blank_edges(lines: Vec<&str>) -> Vec<&str> {
    let Some(start) = lines.iter().position(|line| !is_blank(line)) else {
        return Vec::new();
    };
    let end = lines
        .iter()
        .rposition(|line| !is_blank(line))
        .unwrap_or(start);
    lines[start..=end].to_vec()
}

/// Number of leading space characters.
pub fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Replace each tab in the leading whitespace with `tab_size` spaces.
pub fn expand_leading_tabs(line: &str, tab_size: usize) -> Cow<'_, str> {
    let indent_len = line.len() - line.trim_start_matches([' ', '\t']).len();
    let (indent, rest) = line.split_at(indent_len);
    if !indent.contains('\t') {
        return Cow::Borrowed(line);
    }
    let mut expanded = indent.replace('\t', &" ".repeat(tab_size));
    expanded.push_str(rest);
    Cow::Owned(expanded)
}

/// Smallest indentation among non-blank lines, or zero when there are none.
pub fn common_indent(lines: &[&str]) -> usize {
    lines
        .iter()
        .filter(|line| !is_blank(line))
        .map(|line| leading_spaces(line))
        .min()
        .unwrap_or(0)
}

/// Strip the shared indentation. Lines indented less than that (only blank
/// ones can be) lose all their leading spaces.
pub fn dedent_lines<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let indent = common_indent(lines);
    lines
        .iter()
        .map(|line| &line[leading_spaces(line).min(indent)..])
        .collect()
}

/// Smallest nonzero indentation among non-blank lines.
pub fn detect_indent_step(lines: &[&str]) -> Option<usize> {
    lines
        .iter()
        .filter(|line| !is_blank(line))
        .map(|line| leading_spaces(line))
        .filter(|&spaces| spaces > 0)
        .min()
}

/// Rescale indentation from the detected step to `tab_size` spaces per
/// level. A remainder shorter than one step is kept unchanged.
pub fn reindent(code: &str, tab_size: usize) -> String {
    let lines: Vec<&str> = code.split('\n').collect();
    let Some(step) = detect_indent_step(&lines) else {
        return code.to_string();
    };
    if step == tab_size {
        return code.to_string();
    }

    lines
        .iter()
        .map(|line| {
            let spaces = leading_spaces(line);
            let width = (spaces / step) * tab_size + spaces % step;
            format!("{}{}", " ".repeat(width), &line[spaces..])
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedent_guarded() {
        assert_eq!(dedent_lines(&["  a", "    b", "  "]), vec!["a", "  b", ""]);
    }

    #[test]
    fn test_dedent_no_content_lines() {
        assert_eq!(common_indent(&["   ", ""]), 0);
        assert_eq!(dedent_lines(&["   ", ""]), vec!["   ", ""]);
    }

    #[test]
    fn test_normalize_default_example() {
        assert_eq!(normalize("  def f():\n    pass", 2), "def f():\n  pass");
    }

    #[test]
    fn test_trims_blank_edges_keeps_interior() {
        let raw = "\n   \n    let a = 1;\n\n    let b = 2;\n  \n";
        assert_eq!(normalize(raw, 2), "let a = 1;\n\nlet b = 2;");
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(normalize("", 2), "");
        assert_eq!(normalize("  \n\t\n ", 2), "");
    }

    #[test]
    fn test_tabs_expanded() {
        assert_eq!(expand_leading_tabs("\tx\ty", 4), "    x\ty");
        assert_eq!(normalize("a\n\tb\n\t\tc", 2), "a\n  b\n    c");
    }

    #[test]
    fn test_entities_decoded_once() {
        assert_eq!(
            normalize("    if a &lt; b &amp;&amp; c {\n      x&amp;lt;\n    }", 2),
            "if a < b && c {\n  x&lt;\n}"
        );
    }

    #[test]
    fn test_reindent_scales_steps() {
        let code = "a\n    b\n        c\n    d";
        assert_eq!(reindent(code, 2), "a\n  b\n    c\n  d");
    }

    #[test]
    fn test_reindent_keeps_remainder() {
        // Step is 4; the six-space line is one level plus a two-space remainder.
        let code = "a\n    b\n      c";
        assert_eq!(reindent(code, 2), "a\n  b\n    c");
        assert_eq!(reindent("a\n    b\n     c", 2), "a\n  b\n   c");
    }

    #[test]
    fn test_reindent_no_indentation() {
        assert_eq!(reindent("a\nb", 2), "a\nb");
    }

    #[test]
    fn test_idempotent_on_entity_free_code() {
        let samples = [
            "  def f():\n    pass",
            "\n\tfn main() {\n\t\tlet x = 1;\n\n\t}\n",
            "      a\n          b\n         c\n      d",
            "x",
        ];
        for raw in samples {
            let once = normalize(raw, 2);
            assert_eq!(normalize(&once, 2), once, "not idempotent for {raw:?}");
        }
    }
}
