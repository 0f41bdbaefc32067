//! Error type shared by every stage of the inventory pipeline.
//!
//! All errors are fatal to a run: there is no partial-result mode. The one
//! non-error "failure" in the pipeline is a transform regex that does not
//! match, which silently drops the row.

use thiserror::Error;

/// Error type for inventory operations
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Missing document sections or attributes, broken `use` references,
    /// invalid regexes, or a transform field absent from a row.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unknown `type` discriminator, unknown output name, or a row missing
    /// its host field.
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// A group key template that could not be rendered against a row.
    #[error("Template error in '{template}': {reason}")]
    Template { template: String, reason: String },

    /// Connection or query failure from the backing data source.
    #[error("Source error: {0}")]
    Source(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InventoryError {
    pub fn config(msg: impl Into<String>) -> Self {
        InventoryError::Configuration(msg.into())
    }

    pub fn lookup(msg: impl Into<String>) -> Self {
        InventoryError::Lookup(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
