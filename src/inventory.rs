//! Inventory orchestration.
//!
//! Wires every configured input into every active output:
//!
//! 1. Each input runs to completion: acquire → transform → group, plus host
//!    variables when configured.
//! 2. Its groups and variables are fed into every active output. Variables
//!    go in before groups.
//! 3. After all inputs have run, every output is emitted exactly once.
//!
//! Any error aborts the run. No output is emitted after a failed input.

use indexmap::IndexMap;
use std::io::Write;
use std::path::Path;

use crate::config::ConfigDocument;
use crate::error::{InventoryError, Result};
use crate::input::Input;
use crate::output::Output;

/// Configured inputs and outputs for one run
#[derive(Debug)]
pub struct Inventory {
    inputs: IndexMap<String, Input>,
    outputs: IndexMap<String, Output>,
}

impl Inventory {
    /// Load and build an inventory from a YAML config file.
    ///
    /// # Example
    /// ```ignore
    /// use nomnom_inventory::Inventory;
    ///
    /// let inventory = Inventory::load_from_file("inv.yml")?;
    /// inventory.run(&mut std::io::stdout())?;
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_document(&ConfigDocument::load_from_file(path)?)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        Self::from_document(&ConfigDocument::from_yaml_str(contents)?)
    }

    /// Resolve the document and construct every input and output.
    pub fn from_document(doc: &ConfigDocument) -> Result<Self> {
        let mut inputs = IndexMap::new();
        for (name, spec) in doc.resolve_inputs()? {
            let input = Input::from_spec(&name, &spec)?;
            inputs.insert(name, input);
        }

        let mut outputs = IndexMap::new();
        for (name, spec) in doc.resolve_outputs()? {
            let output = Output::from_spec(&name, &spec)?;
            outputs.insert(name, output);
        }

        tracing::debug!("Loaded {} inputs and {} outputs", inputs.len(), outputs.len());

        Ok(Self { inputs, outputs })
    }

    /// Names of the currently active outputs
    pub fn output_names(&self) -> impl Iterator<Item = &String> {
        self.outputs.keys()
    }

    /// Keep only the named output active.
    ///
    /// # Errors
    /// Returns `Lookup` if no output has that name.
    pub fn restrict_to(&mut self, name: &str) -> Result<()> {
        if !self.outputs.contains_key(name) {
            return Err(InventoryError::lookup(format!("no output named '{}'", name)));
        }
        self.outputs.retain(|output, _| output == name);
        Ok(())
    }

    /// Run every input and feed the results into the active outputs, without
    /// emitting anything.
    pub fn collect(mut self) -> Result<IndexMap<String, Output>> {
        for (name, input) in &self.inputs {
            tracing::info!("Processing input '{}'", name);

            let data = input.transform(input.acquire()?)?;
            let grouped = input.group(&data)?;
            let host_vars = if input.has_host_vars() {
                Some(input.compute_host_vars(&data)?)
            } else {
                None
            };

            tracing::debug!(
                "Input '{}': {} rows after transforms, {} groups",
                name,
                data.len(),
                grouped.len()
            );

            for output in self.outputs.values_mut() {
                if let Some(host_vars) = &host_vars {
                    output.add_host_vars(host_vars);
                }
                output.add_grouped_data(&grouped);
            }
        }

        Ok(self.outputs)
    }

    /// Run the pipeline, then emit every active output once.
    ///
    /// Outputs without a `file` are written to `stdout`.
    pub fn run(self, stdout: &mut dyn Write) -> Result<()> {
        for output in self.collect()?.values() {
            output.emit(stdout)?;
        }
        Ok(())
    }
}
