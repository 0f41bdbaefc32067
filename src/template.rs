//! Group key templates.
//!
//! A group field such as `"{{ site }}_{{ role }}"` is rendered once per row with
//! every row field available as a variable. Only substitution is supported.
//! Strict mode turns a reference to a missing field into an error instead of
//! a blank.

use handlebars::Handlebars;
use std::fmt;

use crate::data::Row;
use crate::error::{InventoryError, Result};

const TEMPLATE_NAME: &str = "group_field";

/// A compiled group key template
#[derive(Clone)]
pub struct GroupTemplate {
    source: String,
    registry: Handlebars<'static>,
}

impl GroupTemplate {
    /// Compile a template string.
    ///
    /// # Errors
    /// Returns `Template` if the string is not a valid template.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();

        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(TEMPLATE_NAME, &source)
            .map_err(|e| InventoryError::Template {
                template: source.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self { source, registry })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the template with the row's fields as variables.
    pub fn render(&self, row: &Row) -> Result<String> {
        self.registry
            .render(TEMPLATE_NAME, row)
            .map_err(|e| InventoryError::Template {
                template: self.source.clone(),
                reason: e.to_string(),
            })
    }
}

impl fmt::Debug for GroupTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GroupTemplate").field(&self.source).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{row, FieldValue};

    #[test]
    fn test_render_substitutes_fields() {
        let template = GroupTemplate::new("{{ site }}_{{role}}").unwrap();
        let r = row(&[("site", "ams"), ("role", "web"), ("name", "web1")]);
        assert_eq!(template.render(&r).unwrap(), "ams_web");
    }

    #[test]
    fn test_render_literal_template() {
        let template = GroupTemplate::new("all").unwrap();
        assert_eq!(template.render(&row(&[("name", "x")])).unwrap(), "all");
    }

    #[test]
    fn test_render_does_not_escape() {
        let template = GroupTemplate::new("{{ tag }}").unwrap();
        let r = row(&[("tag", "a&b<c>")]);
        assert_eq!(template.render(&r).unwrap(), "a&b<c>");
    }

    #[test]
    fn test_render_numbers() {
        let template = GroupTemplate::new("vlan{{ vlan }}").unwrap();
        let mut r = Row::new();
        r.insert("vlan".to_string(), FieldValue::Int(120));
        assert_eq!(template.render(&r).unwrap(), "vlan120");
    }

    #[test]
    fn test_missing_variable_is_error() {
        let template = GroupTemplate::new("{{ rack }}").unwrap();
        let result = template.render(&row(&[("site", "ams")]));
        match result {
            Err(InventoryError::Template { template, .. }) => assert_eq!(template, "{{ rack }}"),
            other => panic!("expected template error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_template_syntax() {
        assert!(matches!(
            GroupTemplate::new("{{ site"),
            Err(InventoryError::Template { .. })
        ));
    }
}
