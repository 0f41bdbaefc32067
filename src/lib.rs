//! # Nomnom Inventory: Dynamic Ansible Inventory from SQL
//!
//! Queries a relational database, reshapes the rows into named groups of hosts
//! (optionally with per-host variables), and emits an Ansible inventory.
//!
//! ## Pipeline
//!
//! - **Input**: acquire rows from a source (`psql`, `static`)
//! - **Transform**: regex field extraction that also filters rows
//! - **Group**: bucket host identifiers by a templated group key
//! - **Output**: serialize as a JSON inventory or an INI-style listing
//!
//! ## Example
//!
//! ```yaml
//! Input:
//!   servers:
//!     type: psql
//!     dbname: cmdb
//!     user: inventory
//!     host: db.example.com
//!     password: secret
//!     select: SELECT hostname, ip FROM servers
//!     transform:
//!       - field: hostname
//!         regex: '([a-z]+)-'
//!         out: site
//!     group_field: "dc_{{ site }}"
//!     host_field: hostname
//!     host_vars:
//!       - column: ip
//!         var: ansible_host
//! Output:
//!   ansible:
//!     type: AnsibleJSON
//! ```

// Core modules
pub mod error;
pub mod data;
pub mod template;
pub mod transform;
pub mod config;

// Sources and serializers
pub mod input;
pub mod output;

// Orchestration
pub mod inventory;

// Re-export key types
pub use error::{InventoryError, Result};
pub use data::{FieldValue, Row, TabularData, GroupedHosts, HostVars};
pub use template::GroupTemplate;
pub use transform::{Transform, TransformSpec};
pub use config::{ConfigDocument, InputSpec, OutputSpec, HostVarSpec, merge_use};
pub use input::{Input, InputSource, RowSource};
pub use output::{Output, OutputFormat, InventoryFormat};
pub use inventory::Inventory;
