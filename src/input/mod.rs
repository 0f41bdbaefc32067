//! Inventory inputs.
//!
//! An [`Input`] pairs a row source with the rules that turn its rows into
//! groups: transforms, the group key template, the host field and optional
//! host variable extraction. The set of sources is closed. [`Input::from_spec`]
//! matches the `type` discriminator and fails on anything it does not know.

#[cfg(feature = "postgres")]
pub mod psql;
pub mod static_rows;

use crate::config::{HostVarSpec, InputSpec};
use crate::data::{host_identifier, GroupedHosts, HostVars, TabularData};
use crate::error::{InventoryError, Result};
use crate::template::GroupTemplate;
use crate::transform::{self, Transform};

#[cfg(feature = "postgres")]
pub use psql::PsqlSource;
pub use static_rows::StaticSource;

/// Trait for backing sources that produce rows.
///
/// Each call to `acquire` is a fresh, complete read of the source.
pub trait RowSource {
    fn acquire(&self) -> Result<TabularData>;
}

/// Known source variants, selected by an input's `type`
#[derive(Debug)]
pub enum InputSource {
    #[cfg(feature = "postgres")]
    Psql(PsqlSource),
    Static(StaticSource),
}

impl InputSource {
    /// Build the source named by `spec.kind`.
    ///
    /// # Errors
    /// * `Lookup` for an unknown type
    /// * `Configuration` if the type-specific attributes are missing or invalid
    pub fn from_spec(name: &str, spec: &InputSpec) -> Result<Self> {
        match spec.kind.as_str() {
            #[cfg(feature = "postgres")]
            "psql" => Ok(InputSource::Psql(PsqlSource::from_options(name, &spec.options)?)),
            #[cfg(not(feature = "postgres"))]
            "psql" => Err(InventoryError::config(format!(
                "Input '{}': type 'psql' requires the 'postgres' feature",
                name
            ))),
            "static" => Ok(InputSource::Static(StaticSource::from_options(name, &spec.options)?)),
            other => Err(InventoryError::lookup(format!(
                "Input '{}': unknown input type '{}'",
                name, other
            ))),
        }
    }
}

impl RowSource for InputSource {
    fn acquire(&self) -> Result<TabularData> {
        match self {
            #[cfg(feature = "postgres")]
            InputSource::Psql(source) => source.acquire(),
            InputSource::Static(source) => source.acquire(),
        }
    }
}

/// A configured input
#[derive(Debug)]
pub struct Input {
    name: String,
    source: InputSource,
    transforms: Vec<Transform>,
    group_template: GroupTemplate,
    host_field: String,
    host_vars: Option<Vec<HostVarSpec>>,
}

impl Input {
    /// Build an input from its resolved spec.
    pub fn from_spec(name: &str, spec: &InputSpec) -> Result<Self> {
        let source = InputSource::from_spec(name, spec)?;

        let transforms = spec
            .transform
            .iter()
            .cloned()
            .map(Transform::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            source,
            transforms,
            group_template: GroupTemplate::new(spec.group_field.clone())?,
            host_field: spec.host_field.clone(),
            host_vars: spec.host_vars.clone(),
        })
    }

    pub fn has_host_vars(&self) -> bool {
        self.host_vars.is_some()
    }

    pub fn acquire(&self) -> Result<TabularData> {
        let data = self.source.acquire()?;
        tracing::debug!("Input '{}' acquired {} rows", self.name, data.len());
        Ok(data)
    }

    /// Apply the configured transforms in declared order.
    pub fn transform(&self, data: TabularData) -> Result<TabularData> {
        transform::apply_all(&self.transforms, data)
    }

    pub fn group(&self, data: &TabularData) -> Result<GroupedHosts> {
        data.group(&self.group_template, &self.host_field)
    }

    /// Build the host variable map from the configured `{column, var}` pairs.
    ///
    /// Columns absent from a row are skipped. When a host appears in several
    /// rows, the last row wins. Returns an empty map if `host_vars` is not
    /// configured.
    pub fn compute_host_vars(&self, data: &TabularData) -> Result<HostVars> {
        let mut host_vars = HostVars::new();
        let Some(pairs) = &self.host_vars else {
            return Ok(host_vars);
        };

        for row in data.rows() {
            let vars = pairs
                .iter()
                .filter_map(|pair| {
                    row.get(&pair.column)
                        .map(|value| (pair.var.clone(), value.clone()))
                })
                .collect();
            host_vars.insert(host_identifier(row, &self.host_field)?, vars);
        }

        Ok(host_vars)
    }
}
