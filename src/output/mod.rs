//! Inventory outputs.
//!
//! An output accumulates grouped hosts and host variables from every input
//! that feeds it. It serializes them once, after all inputs have run. The
//! set of formats is closed. [`OutputFormat::from_spec`] matches the `type`
//! discriminator.

pub mod ini;
pub mod json;

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::config::OutputSpec;
use crate::data::{GroupedHosts, HostVars};
use crate::error::{InventoryError, Result};

pub use ini::IniInventory;
pub use json::JsonInventory;

/// Trait for inventory serializers
pub trait InventoryFormat {
    /// Merge one input's groups. A group name seen before is replaced.
    fn add_grouped_data(&mut self, grouped: &GroupedHosts);

    /// Merge one input's host variables. A host seen before is replaced.
    fn add_host_vars(&mut self, host_vars: &HostVars);

    fn serialize(&self) -> Result<String>;
}

/// Known formats, selected by an output's `type`
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Json(JsonInventory),
    Ini(IniInventory),
}

impl OutputFormat {
    pub fn from_spec(name: &str, spec: &OutputSpec) -> Result<Self> {
        match spec.kind.as_str() {
            "AnsibleJSON" => Ok(OutputFormat::Json(JsonInventory::new(spec.pretty))),
            "AnsibleINI" => Ok(OutputFormat::Ini(IniInventory::new())),
            other => Err(InventoryError::lookup(format!(
                "Output '{}': unknown output type '{}'",
                name, other
            ))),
        }
    }

    fn inner(&self) -> &dyn InventoryFormat {
        match self {
            OutputFormat::Json(f) => f,
            OutputFormat::Ini(f) => f,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn InventoryFormat {
        match self {
            OutputFormat::Json(f) => f,
            OutputFormat::Ini(f) => f,
        }
    }
}

impl InventoryFormat for OutputFormat {
    fn add_grouped_data(&mut self, grouped: &GroupedHosts) {
        self.inner_mut().add_grouped_data(grouped)
    }

    fn add_host_vars(&mut self, host_vars: &HostVars) {
        self.inner_mut().add_host_vars(host_vars)
    }

    fn serialize(&self) -> Result<String> {
        self.inner().serialize()
    }
}

/// A configured output: a format plus its destination
#[derive(Debug, Clone)]
pub struct Output {
    name: String,
    file: Option<PathBuf>,
    format: OutputFormat,
}

impl Output {
    pub fn from_spec(name: &str, spec: &OutputSpec) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            file: spec.file.clone(),
            format: OutputFormat::from_spec(name, spec)?,
        })
    }

    pub fn add_grouped_data(&mut self, grouped: &GroupedHosts) {
        self.format.add_grouped_data(grouped);
    }

    pub fn add_host_vars(&mut self, host_vars: &HostVars) {
        self.format.add_host_vars(host_vars);
    }

    pub fn serialize(&self) -> Result<String> {
        self.format.serialize()
    }

    /// Write the serialized inventory to the configured file, or to `stdout`
    /// when no file is set. Non-empty text always ends with a newline; an
    /// empty serialization writes nothing.
    pub fn emit(&self, stdout: &mut dyn Write) -> Result<()> {
        let mut text = self.serialize()?;
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }

        match &self.file {
            Some(path) => {
                fs::write(path, &text)?;
                tracing::info!("Output '{}' written to {}", self.name, path.display());
            }
            None => {
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
                tracing::info!("Output '{}' written to stdout", self.name);
            }
        }

        Ok(())
    }
}
