//! Process-wide configuration shared by every element instance.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::attrs::Attribute;

/// Default custom element tag name.
pub const DEFAULT_TAG_NAME: &str = "source-code";

/// Settings read by every render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentConfig {
    /// Spaces per indentation level, also inserted by the Tab key.
    pub tab_size: usize,
    /// While typing, the display is padded with blank rows up to this many
    /// lines so the element does not grow one row at a time.
    pub on_type_min_lines: usize,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            tab_size: 2,
            on_type_min_lines: 4,
        }
    }
}

impl ComponentConfig {
    /// Tab size clamped to something indentation math can divide by.
    pub fn effective_tab_size(&self) -> usize {
        self.tab_size.max(1)
    }
}

/// Forced values for boolean attributes, applied to every instance.
///
/// A forced value wins over whatever the element itself says.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalAttributes(BTreeMap<SmolStr, bool>);

impl GlobalAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge overrides on top of the current ones.
    pub fn merge(&mut self, overrides: impl IntoIterator<Item = (SmolStr, bool)>) {
        self.0.extend(overrides);
    }

    pub fn set(&mut self, name: impl Into<SmolStr>, value: bool) {
        self.0.insert(name.into(), value);
    }

    /// Forced value for an attribute, checking its aliases too.
    pub fn get(&self, attribute: Attribute) -> Option<bool> {
        attribute
            .names()
            .iter()
            .find_map(|name| self.0.get(*name).copied())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Resolve an attribute the way every render reads it.
///
/// `host_value` looks up a raw attribute on the element by name. The result
/// is `None` when the attribute is off, `Some("")` when it is on without a
/// value, and `Some(value)` otherwise.
pub fn resolve_attribute<F>(
    globals: &GlobalAttributes,
    attribute: Attribute,
    host_value: F,
) -> Option<Cow<'static, str>>
where
    F: Fn(&str) -> Option<String>,
{
    match globals.get(attribute) {
        Some(true) => return Some(Cow::Borrowed("")),
        Some(false) => return None,
        None => {}
    }

    attribute
        .names()
        .iter()
        .find_map(|name| host_value(name))
        .filter(|value| value != "false")
        .map(Cow::Owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host<'a>(attrs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            attrs
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults() {
        let config = ComponentConfig::default();
        assert_eq!(config.tab_size, 2);
        assert_eq!(config.on_type_min_lines, 4);
    }

    #[test]
    fn test_effective_tab_size_never_zero() {
        let config = ComponentConfig {
            tab_size: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_tab_size(), 1);
    }

    #[test]
    fn test_resolve_from_host() {
        let globals = GlobalAttributes::new();
        let attrs = [("language", "rust"), ("copy", "")];
        assert_eq!(
            resolve_attribute(&globals, Attribute::Language, host(&attrs)).as_deref(),
            Some("rust")
        );
        assert_eq!(
            resolve_attribute(&globals, Attribute::Copy, host(&attrs)).as_deref(),
            Some("")
        );
        assert_eq!(resolve_attribute(&globals, Attribute::Scroll, host(&attrs)), None);
    }

    #[test]
    fn test_resolve_alias() {
        let globals = GlobalAttributes::new();
        let attrs = [("copyable", ""), ("edit", "")];
        assert!(resolve_attribute(&globals, Attribute::Copy, host(&attrs)).is_some());
        assert!(resolve_attribute(&globals, Attribute::Editable, host(&attrs)).is_some());
    }

    #[test]
    fn test_resolve_false_string_is_off() {
        let globals = GlobalAttributes::new();
        let attrs = [("editable", "false")];
        assert_eq!(resolve_attribute(&globals, Attribute::Editable, host(&attrs)), None);
    }

    #[test]
    fn test_global_override_wins() {
        let mut globals = GlobalAttributes::new();
        globals.set("editable", true);
        globals.set("copy", false);
        let attrs = [("copy", "")];
        assert_eq!(
            resolve_attribute(&globals, Attribute::Editable, host(&attrs)).as_deref(),
            Some("")
        );
        assert_eq!(resolve_attribute(&globals, Attribute::Copy, host(&attrs)), None);

        globals.clear();
        assert!(globals.is_empty());
        assert_eq!(
            resolve_attribute(&globals, Attribute::Copy, host(&attrs)).as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: ComponentConfig = serde_json::from_str(r#"{"tabSize":4}"#).unwrap();
        assert_eq!(config.tab_size, 4);
        assert_eq!(config.on_type_min_lines, 4);
    }

    #[test]
    fn test_global_attributes_deserialize() {
        let globals: GlobalAttributes =
            serde_json::from_str(r#"{"editable":true,"scroll":false}"#).unwrap();
        assert_eq!(globals.get(Attribute::Editable), Some(true));
        assert_eq!(globals.get(Attribute::Scroll), Some(false));
        assert_eq!(globals.get(Attribute::Copy), None);
    }
}
