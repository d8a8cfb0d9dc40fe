//! Temporary inline style overrides on the host element.
//!
//! The host is hidden until its content has been normalized and made
//! unselectable until typing finishes. Whatever inline value the author had
//! set is put back afterwards, and an inline `style` attribute left empty by
//! that is removed entirely.

use web_sys::HtmlElement;

use crate::error::DomError;

/// Inline style values saved before being overridden.
#[derive(Debug, Clone, Default)]
pub struct StyleRecovery {
    saved: Vec<(&'static str, String)>,
}

impl StyleRecovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override `property`, remembering its previous inline value.
    pub fn suppress(
        &mut self,
        element: &HtmlElement,
        property: &'static str,
        value: &str,
    ) -> Result<(), DomError> {
        let style = element.style();
        let previous = style.get_property_value(property)?;
        if !self.saved.iter().any(|(saved, _)| *saved == property) {
            self.saved.push((property, previous));
        }
        style.set_property(property, value)?;
        Ok(())
    }

    /// Put back the value saved for `property`. Does nothing if it was never
    /// suppressed or has already been recovered.
    pub fn recover(&mut self, element: &HtmlElement, property: &str) -> Result<(), DomError> {
        let Some(index) = self.saved.iter().position(|(saved, _)| *saved == property) else {
            return Ok(());
        };
        let (_, previous) = self.saved.swap_remove(index);

        let style = element.style();
        if previous.is_empty() {
            style.remove_property(property)?;
        } else {
            style.set_property(property, &previous)?;
        }
        if style.length() == 0 {
            element.remove_attribute("style")?;
        }
        Ok(())
    }

    pub fn is_suppressed(&self, property: &str) -> bool {
        self.saved.iter().any(|(saved, _)| *saved == property)
    }
}
