//! Ansible JSON inventory.
//!
//! ```json
//! {"web": {"hosts": ["h1", "h2"]}, "_meta": {"hostvars": {"h1": {"ip": "10.0.0.1"}}}}
//! ```
//!
//! All host variables are embedded under `_meta.hostvars`, so Ansible never
//! needs to call the script once per host.

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::data::{GroupedHosts, HostVars};
use crate::error::Result;
use crate::output::InventoryFormat;

const META_KEY: &str = "_meta";

#[derive(Debug, Clone, Default)]
pub struct JsonInventory {
    groups: GroupedHosts,
    host_vars: HostVars,
    pretty: bool,
}

impl JsonInventory {
    pub fn new(pretty: bool) -> Self {
        Self {
            pretty,
            ..Default::default()
        }
    }

    /// Build the inventory document.
    pub fn document(&self) -> Result<IndexMap<String, Value>> {
        let mut doc = IndexMap::new();
        for (group, hosts) in &self.groups {
            if group == META_KEY {
                tracing::warn!("Group '{}' collides with the inventory metadata key and is skipped", group);
                continue;
            }
            doc.insert(group.clone(), json!({ "hosts": hosts }));
        }
        doc.insert(
            META_KEY.to_string(),
            json!({ "hostvars": serde_json::to_value(&self.host_vars)? }),
        );
        Ok(doc)
    }
}

impl InventoryFormat for JsonInventory {
    fn add_grouped_data(&mut self, grouped: &GroupedHosts) {
        for (group, hosts) in grouped {
            self.groups.insert(group.clone(), hosts.clone());
        }
    }

    fn add_host_vars(&mut self, host_vars: &HostVars) {
        for (host, vars) in host_vars {
            self.host_vars.insert(host.clone(), vars.clone());
        }
    }

    fn serialize(&self) -> Result<String> {
        let doc = self.document()?;
        let text = if self.pretty {
            serde_json::to_string_pretty(&doc)?
        } else {
            serde_json::to_string(&doc)?
        };
        Ok(text)
    }
}
