//! Inline row source.
//!
//! Rows are declared directly in the input's `rows:` list:
//!
//! ```yaml
//! Input:
//!   appliances:
//!     type: static
//!     group_field: appliances
//!     host_field: name
//!     rows:
//!       - { name: fw1, ip: 10.0.0.254 }
//! ```

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::data::{Row, TabularData};
use crate::error::{InventoryError, Result};
use crate::input::RowSource;

#[derive(Debug, Clone, Deserialize)]
struct StaticOptions {
    rows: Vec<Row>,
}

/// Rows declared in configuration
#[derive(Debug, Clone)]
pub struct StaticSource {
    rows: Vec<Row>,
}

impl StaticSource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn from_options(name: &str, options: &Mapping) -> Result<Self> {
        let options: StaticOptions = serde_yaml::from_value(Value::Mapping(options.clone()))
            .map_err(|e| InventoryError::config(format!("Input '{}': {}", name, e)))?;
        Ok(Self::new(options.rows))
    }
}

impl RowSource for StaticSource {
    fn acquire(&self) -> Result<TabularData> {
        Ok(self.rows.iter().cloned().collect())
    }
}
