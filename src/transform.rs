//! Regex field transforms.
//!
//! A transform reads one field, matches a regex anchored at the start of its
//! text, and writes the first capture group to a new field. Rows that do not
//! match are dropped, so a chain of transforms is also a chain of filters.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::data::{FieldValue, TabularData};
use crate::error::{InventoryError, Result};

/// Transform definition from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformSpec {
    /// Field to read
    pub field: String,

    /// Pattern matched at the start of the field's text
    pub regex: String,

    /// Field that receives the first capture group
    pub out: String,
}

/// A transform with its regex compiled
#[derive(Debug, Clone)]
pub struct Transform {
    spec: TransformSpec,
    pattern: Regex,
}

impl Transform {
    /// Compile a transform.
    ///
    /// # Errors
    /// Returns `Configuration` if the regex is invalid or has no capture group.
    pub fn new(spec: TransformSpec) -> Result<Self> {
        // \A anchors at the start of the text only, like a match-at-start.
        let pattern = Regex::new(&format!(r"\A(?:{})", spec.regex)).map_err(|e| {
            InventoryError::config(format!("invalid regex '{}' in transform: {}", spec.regex, e))
        })?;

        if pattern.captures_len() < 2 {
            return Err(InventoryError::config(format!(
                "regex '{}' in transform on '{}' has no capture group",
                spec.regex, spec.field
            )));
        }

        Ok(Self { spec, pattern })
    }

    /// Apply the transform to every row, keeping only rows that match.
    ///
    /// # Errors
    /// Returns `Configuration` if a row lacks the configured field.
    pub fn apply(&self, data: TabularData) -> Result<TabularData> {
        let before = data.len();
        let mut out = TabularData::new();

        for mut row in data {
            let text = row
                .get(&self.spec.field)
                .ok_or_else(|| {
                    InventoryError::config(format!(
                        "invalid data in transform - field '{}' does not exist",
                        self.spec.field
                    ))
                })?
                .to_string();

            let Some(caps) = self.pattern.captures(&text) else {
                continue;
            };

            let value = caps
                .get(1)
                .map(|m| FieldValue::String(m.as_str().to_string()))
                .unwrap_or(FieldValue::Null);
            row.insert(self.spec.out.clone(), value);
            out.add_row(row);
        }

        tracing::debug!(
            "Transform {} -> {}: kept {} of {} rows",
            self.spec.field,
            self.spec.out,
            out.len(),
            before
        );

        Ok(out)
    }
}

/// Apply transforms in order, each on the output of the previous one.
pub fn apply_all(transforms: &[Transform], data: TabularData) -> Result<TabularData> {
    transforms.iter().try_fold(data, |data, t| t.apply(data))
}
