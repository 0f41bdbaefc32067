//! Inventory configuration loader.
//!
//! The document has two required top-level sections:
//!
//! ```yaml
//! Input:
//!   hosts:
//!     type: psql
//!     dbname: cmdb
//!     user: inventory
//!     host: db.example.com
//!     password: secret
//!     select: SELECT name, site FROM hosts
//!     group_field: "{{ site }}"
//!     host_field: name
//!   extra:
//!     use: hosts
//!     select: SELECT name, site FROM appliances
//! Output:
//!   ansible:
//!     type: AnsibleJSON
//! ```
//!
//! Entries are resolved in two passes: raw attribute maps are collected first,
//! then each input that names a parent with `use` is merged with it one level
//! deep before being turned into a typed spec.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InventoryError, Result};
use crate::transform::TransformSpec;

const INPUT_SECTION: &str = "Input";
const OUTPUT_SECTION: &str = "Output";
const INPUT_REQUIRED: [&str; 3] = ["type", "group_field", "host_field"];
const OUTPUT_REQUIRED: [&str; 1] = ["type"];

/// One `{column, var}` pair of an input's `host_vars` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HostVarSpec {
    pub column: String,
    pub var: String,
}

/// Resolved input configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InputSpec {
    /// Registry key selecting the source (`psql`, `static`)
    #[serde(rename = "type")]
    pub kind: String,

    /// Template rendered per row to get a group name
    pub group_field: String,

    /// Literal field holding the host identifier
    pub host_field: String,

    #[serde(default)]
    pub transform: Vec<TransformSpec>,

    /// Present only when host variables should be computed
    #[serde(default)]
    pub host_vars: Option<Vec<HostVarSpec>>,

    /// Input this one inherited unset attributes from
    #[serde(default, rename = "use")]
    pub parent: Option<String>,

    /// Type-specific attributes (`dbname`, `select`, `rows`, ...)
    #[serde(flatten)]
    pub options: Mapping,
}

/// Resolved output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSpec {
    /// Registry key selecting the format (`AnsibleJSON`, `AnsibleINI`)
    #[serde(rename = "type")]
    pub kind: String,

    /// Destination file; standard output when absent
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Indent JSON output
    #[serde(default)]
    pub pretty: bool,
}

/// Raw configuration document: section entries by name, in declared order.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    pub inputs: IndexMap<String, Mapping>,
    pub outputs: IndexMap<String, Mapping>,
}

impl ConfigDocument {
    /// Load a configuration document from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|e| {
            InventoryError::config(format!("failed to read config file {}: {}", path.display(), e))
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Parse a configuration document from YAML text.
    ///
    /// # Errors
    /// Returns `Configuration` if either section is missing or malformed.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let yaml: Value = serde_yaml::from_str(contents)?;

        let inputs = section(&yaml, INPUT_SECTION)?;
        let outputs = section(&yaml, OUTPUT_SECTION)?;

        Ok(Self { inputs, outputs })
    }

    /// Resolve every input, applying `use` inheritance.
    ///
    /// # Errors
    /// Returns `Configuration` if a `use` names an unknown input, a `use` chain
    /// is cyclic, or a required attribute is missing after the merge.
    pub fn resolve_inputs(&self) -> Result<IndexMap<String, InputSpec>> {
        let mut resolved = IndexMap::new();

        for (name, attrs) in &self.inputs {
            check_use_chain(&self.inputs, name)?;

            let merged = match parent_name(attrs, name)? {
                Some(parent) => merge_use(attrs, &self.inputs[parent.as_str()]),
                None => attrs.clone(),
            };

            let spec: InputSpec = typed_entry(INPUT_SECTION, name, merged, &INPUT_REQUIRED)?;
            resolved.insert(name.clone(), spec);
        }

        Ok(resolved)
    }

    /// Resolve every output.
    pub fn resolve_outputs(&self) -> Result<IndexMap<String, OutputSpec>> {
        self.outputs
            .iter()
            .map(|(name, attrs)| {
                let spec: OutputSpec = typed_entry(OUTPUT_SECTION, name, attrs.clone(), &OUTPUT_REQUIRED)?;
                Ok((name.clone(), spec))
            })
            .collect()
    }
}

/// Copy every parent key not already set locally. Local keys always win.
pub fn merge_use(local: &Mapping, parent: &Mapping) -> Mapping {
    let mut merged = local.clone();
    for (key, value) in parent {
        if !merged.contains_key(key) {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

fn section(yaml: &Value, key: &str) -> Result<IndexMap<String, Mapping>> {
    let entries = yaml
        .get(key)
        .ok_or_else(|| InventoryError::config(format!("invalid YAML format - missing '{}' section", key)))?
        .as_mapping()
        .ok_or_else(|| InventoryError::config(format!("'{}' section must be a mapping", key)))?;

    let mut out = IndexMap::new();
    for (name, attrs) in entries {
        let name = name
            .as_str()
            .ok_or_else(|| InventoryError::config(format!("'{}' entry names must be strings", key)))?;
        let attrs = attrs.as_mapping().ok_or_else(|| {
            InventoryError::config(format!("{} '{}' must be a mapping", key, name))
        })?;
        out.insert(name.to_string(), attrs.clone());
    }

    Ok(out)
}

fn parent_name(attrs: &Mapping, name: &str) -> Result<Option<String>> {
    match attrs.get("use") {
        None => Ok(None),
        Some(Value::String(parent)) => Ok(Some(parent.clone())),
        Some(_) => Err(InventoryError::config(format!(
            "Input '{}': 'use' must name another input",
            name
        ))),
    }
}

/// Follow `use` links from `start` and reject unknown or repeated targets.
fn check_use_chain(inputs: &IndexMap<String, Mapping>, start: &str) -> Result<()> {
    let mut visited = HashSet::new();
    visited.insert(start.to_string());

    let mut current = start.to_string();
    while let Some(parent) = parent_name(&inputs[current.as_str()], &current)? {
        if !inputs.contains_key(&parent) {
            return Err(InventoryError::config(format!(
                "Input '{}' uses undefined input '{}'",
                current, parent
            )));
        }
        if !visited.insert(parent.clone()) {
            return Err(InventoryError::config(format!(
                "cyclic 'use' reference: Input '{}' leads back to '{}'",
                start, parent
            )));
        }
        current = parent;
    }

    Ok(())
}

fn typed_entry<T>(section: &str, name: &str, attrs: Mapping, required: &[&str]) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    for key in required {
        if !attrs.contains_key(*key) {
            return Err(InventoryError::config(format!(
                "invalid YAML - missing '{}' in {} '{}'",
                key, section, name
            )));
        }
    }

    serde_yaml::from_value(Value::Mapping(attrs))
        .map_err(|e| InventoryError::config(format!("{} '{}': {}", section, name, e)))
}
