//! Element attributes and what a change to each one does.

use std::sync::LazyLock;

use regex_lite::Regex;
use smol_str::ToSmolStr;

use crate::error::AttributeError;

/// Attributes understood by the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Language,
    Editable,
    Copy,
    Highlight,
    Type,
    MaxHeight,
    Scroll,
}

impl Attribute {
    pub const ALL: [Attribute; 7] = [
        Attribute::Language,
        Attribute::Editable,
        Attribute::Copy,
        Attribute::Highlight,
        Attribute::Type,
        Attribute::MaxHeight,
        Attribute::Scroll,
    ];

    /// Canonical name first, then aliases.
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            Attribute::Language => &["language"],
            Attribute::Editable => &["editable", "edit"],
            Attribute::Copy => &["copy", "copyable"],
            Attribute::Highlight => &["highlight"],
            Attribute::Type => &["type"],
            Attribute::MaxHeight => &["maxheight"],
            Attribute::Scroll => &["scroll"],
        }
    }

    pub fn name(&self) -> &'static str {
        self.names()[0]
    }

    /// Look up an attribute by canonical name or alias, case-insensitively.
    pub fn from_name(name: &str) -> Option<Attribute> {
        Self::ALL.into_iter().find(|attribute| {
            attribute
                .names()
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(name))
        })
    }

    /// What a live instance does when this attribute changes.
    pub fn action(&self) -> AttributeAction {
        match self {
            Attribute::Language | Attribute::Highlight | Attribute::Copy | Attribute::Scroll => {
                AttributeAction::Rerender
            }
            Attribute::Editable => AttributeAction::ApplyEditable,
            Attribute::MaxHeight => AttributeAction::ApplyMaxHeight,
            // Speed is read once when the element initializes.
            Attribute::Type => AttributeAction::Ignore,
        }
    }
}

/// Reaction to an attribute change on a connected instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeAction {
    /// Run the renderer again with the current code.
    Rerender,
    /// Toggle `contenteditable` on the edit region.
    ApplyEditable,
    /// Recompute the `max-height` style on the host.
    ApplyMaxHeight,
    Ignore,
}

/// Every attribute name (aliases included) the element observes.
pub fn observed_attributes() -> Vec<&'static str> {
    Attribute::ALL
        .iter()
        .flat_map(|attribute| attribute.names().iter().copied())
        .collect()
}

/// Dispatch table lookup for an attribute change.
pub fn dispatch(name: &str) -> AttributeAction {
    Attribute::from_name(name)
        .map(|attribute| attribute.action())
        .unwrap_or(AttributeAction::Ignore)
}

/// Default multiplier applied to typing delays.
pub const DEFAULT_SPEED: f64 = 1.0;

/// Parse the `type` attribute. An empty value means the default speed.
pub fn parse_speed(value: &str) -> Result<f64, AttributeError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(DEFAULT_SPEED);
    }
    match value.parse::<f64>() {
        Ok(speed) if speed.is_finite() && speed >= 0.0 => Ok(speed),
        _ => Err(AttributeError::InvalidSpeed(value.to_smolstr())),
    }
}

/// Speed from the `type` attribute, falling back to the default on bad input.
pub fn speed_or_default(value: &str) -> f64 {
    parse_speed(value).unwrap_or_else(|e| {
        tracing::debug!("{e}, using default speed");
        DEFAULT_SPEED
    })
}

/// Parse the `maxheight` attribute: a positive number of visible rows.
pub fn parse_max_height(value: &str) -> Result<u32, AttributeError> {
    let value = value.trim();
    match value.parse::<u32>() {
        Ok(rows) if rows > 0 => Ok(rows),
        _ => Err(AttributeError::InvalidMaxHeight(value.to_smolstr())),
    }
}

/// CSS `max-height` value showing `rows` rows, the last one slightly cut off
/// so it is obvious the block scrolls.
pub fn max_height_css(rows: u32) -> String {
    let visible = f64::from(rows) - 0.25;
    format!("calc({visible} * (1rem + var(--line-spacing)))")
}

static STYLESHEET_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(\.\.?/)*([^\s{}/]*/)*[^\s{}/]+$")
        .expect("stylesheet href pattern is valid")
});

/// A string passed to `addStylesheet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylesheetSource<'a> {
    /// Loaded through a `<link rel="stylesheet">`.
    Href(&'a str),
    /// Inlined into a `<style>` element.
    Rules(&'a str),
}

/// Decide whether a stylesheet string is a URL or CSS rules.
pub fn classify_stylesheet(source: &str) -> StylesheetSource<'_> {
    let trimmed = source.trim();
    if STYLESHEET_HREF.is_match(trimmed) {
        StylesheetSource::Href(trimmed)
    } else {
        StylesheetSource::Rules(source)
    }
}
