//! Tabular data passed between pipeline stages.
//!
//! A [`TabularData`] is an ordered list of [`Row`]s. Each row maps a field name
//! to a scalar [`FieldValue`]. Insertion order is the iteration order used
//! by every later stage, so groups and hosts come out in row order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{InventoryError, Result};
use crate::template::GroupTemplate;

/// A scalar value from one column of a source row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl FieldValue {
    /// Convert a decoded JSON value into a field value.
    ///
    /// Arrays and objects have no scalar form, so they are kept as their JSON text.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    FieldValue::Float(f)
                } else {
                    FieldValue::String(n.to_string())
                }
            }
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Null => FieldValue::Null,
            other => FieldValue::String(other.to_string()),
        }
    }
}

/// Plain-text rendering. Null renders as the empty string.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

/// One record from a data source: field name -> value, in column order
pub type Row = IndexMap<String, FieldValue>;

/// Group name -> host identifiers, in first-occurrence order.
///
/// Hosts are not deduplicated within a group.
pub type GroupedHosts = IndexMap<String, Vec<String>>;

/// Host identifier -> variable name -> value
pub type HostVars = IndexMap<String, IndexMap<String, FieldValue>>;

/// Ordered sequence of rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularData {
    rows: Vec<Row>,
}

impl TabularData {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bucket host identifiers by rendered group key.
    ///
    /// # Arguments
    /// * `group_template` - Template rendered against each row to get its group name
    /// * `host_field` - Literal field holding the host identifier
    ///
    /// # Errors
    /// * `Template` if the template references a field the row lacks, or
    ///   renders to an empty group name (e.g. from a null field)
    /// * `Lookup` if the row has no `host_field`, or it is null
    pub fn group(&self, group_template: &GroupTemplate, host_field: &str) -> Result<GroupedHosts> {
        let mut grouped = GroupedHosts::new();

        for (index, row) in self.rows.iter().enumerate() {
            let group = group_template.render(row)?;
            if group.is_empty() {
                return Err(InventoryError::Template {
                    template: group_template.source().to_string(),
                    reason: format!("row {} renders to an empty group name", index),
                });
            }
            let host = host_identifier(row, host_field).map_err(|e| match e {
                InventoryError::Lookup(msg) => InventoryError::Lookup(format!("row {}: {}", index, msg)),
                other => other,
            })?;

            grouped.entry(group).or_default().push(host);
        }

        Ok(grouped)
    }
}

/// Read the host identifier of a row as text.
pub fn host_identifier(row: &Row, host_field: &str) -> Result<String> {
    match row.get(host_field) {
        Some(FieldValue::Null) => Err(InventoryError::lookup(format!(
            "host field '{}' is null",
            host_field
        ))),
        Some(value) => Ok(value.to_string()),
        None => Err(InventoryError::lookup(format!(
            "host field '{}' not present in row",
            host_field
        ))),
    }
}

impl FromIterator<Row> for TabularData {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TabularData {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[cfg(test)]
pub(crate) fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), FieldValue::from(*v)))
        .collect()
}
