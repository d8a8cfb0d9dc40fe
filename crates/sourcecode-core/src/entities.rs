//! HTML entity decoding and escaping.
//!
//! Code arrives as markup (the element's light DOM, or the edit region's
//! `innerHTML`) and leaves as markup (the display table and the edit region).
//! The canonical code string in between is always plain text.

use markdown_weaver_escape::escape_html_body_text;

/// Named entities recognized by [`decode_entities`].
///
/// Browsers know a couple thousand; these are the ones that show up in
/// hand-written code samples and in contenteditable output.
const NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{00A0}'),
    ("ensp", '\u{2002}'),
    ("emsp", '\u{2003}'),
    ("thinsp", '\u{2009}'),
    ("tab", '\t'),
    ("newline", '\n'),
    ("copy", '\u{00A9}'),
    ("reg", '\u{00AE}'),
    ("hellip", '\u{2026}'),
    ("mdash", '\u{2014}'),
    ("ndash", '\u{2013}'),
    ("laquo", '\u{00AB}'),
    ("raquo", '\u{00BB}'),
    ("lsquo", '\u{2018}'),
    ("rsquo", '\u{2019}'),
    ("ldquo", '\u{201C}'),
    ("rdquo", '\u{201D}'),
    ("middot", '\u{00B7}'),
    ("times", '\u{00D7}'),
    ("divide", '\u{00F7}'),
];

/// Longest entity body we bother looking at (`&thinsp;`, `&#x10FFFF;`).
const MAX_ENTITY_LEN: usize = 10;

/// Resolve the body of an entity (the part between `&` and `;`).
fn resolve_entity(body: &str) -> Option<char> {
    if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    NAMED_ENTITIES
        .iter()
        .find(|(name, _)| *name == body)
        .map(|(_, ch)| *ch)
}

/// If `text` starts with a well-formed entity, return its byte length and
/// the character it stands for.
pub fn entity_at(text: &str) -> Option<(usize, char)> {
    let rest = text.strip_prefix('&')?;
    let end = rest
        .char_indices()
        .take(MAX_ENTITY_LEN + 1)
        .find(|(_, c)| *c == ';')
        .map(|(i, _)| i)?;
    let body = &rest[..end];
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_alphanumeric() || c == '#') {
        return None;
    }
    resolve_entity(body).map(|ch| (end + 2, ch))
}

/// Decode HTML entities exactly once.
///
/// Unknown or malformed entities are left as written, the same way a
/// browser leaves `&bogus;` alone.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match entity_at(rest) {
            Some((len, ch)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Escape text for use as HTML body content (`&`, `<`, `>`).
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing into a String cannot fail.
    let _ = escape_html_body_text(&mut out, text);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_named() {
        assert_eq!(decode_entities("a &lt; b &amp;&amp; c &gt; d"), "a < b && c > d");
        assert_eq!(decode_entities("&quot;hi&quot;"), "\"hi\"");
    }

    #[test]
    fn test_decode_numeric() {
        assert_eq!(decode_entities("&#60;div&#x3E;"), "<div>");
        assert_eq!(decode_entities("&#X3c;"), "<");
    }

    #[test]
    fn test_decode_exactly_once() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_decode_leaves_unknown_alone() {
        assert_eq!(decode_entities("a & b"), "a & b");
        assert_eq!(decode_entities("&bogus;"), "&bogus;");
        assert_eq!(decode_entities("&lt"), "&lt");
        assert_eq!(decode_entities("&;"), "&;");
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn test_entity_at() {
        assert_eq!(entity_at("&lt;rest"), Some((4, '<')));
        assert_eq!(entity_at("&#32;"), Some((5, ' ')));
        assert_eq!(entity_at("lt;"), None);
        assert_eq!(entity_at("&averyveryverylongname;"), None);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("if a < b && c > d"), "if a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_html("plain"), "plain");
    }
}
