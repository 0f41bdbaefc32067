//! Ansible INI-style inventory.
//!
//! ```text
//! [web]
//! h1 ip=10.0.0.1
//! h2
//!
//! ```
//!
//! Host variables are looked up when the text is serialized, so they annotate
//! every group no matter which `add_*` call arrived first. Values holding
//! whitespace, `"` or `\` are double-quoted.

use std::fmt::Write;

use crate::data::{GroupedHosts, HostVars};
use crate::error::Result;
use crate::output::InventoryFormat;

#[derive(Debug, Clone, Default)]
pub struct IniInventory {
    groups: GroupedHosts,
    host_vars: HostVars,
}

impl IniInventory {
    pub fn new() -> Self {
        Self::default()
    }

    fn host_line(&self, host: &str) -> String {
        let mut line = host.to_string();
        if let Some(vars) = self.host_vars.get(host) {
            for (key, value) in vars {
                let _ = write!(line, " {}={}", key, quote_value(&value.to_string()));
            }
        }
        line
    }
}

/// Double-quote a value containing whitespace or quotes, escaping `\` and `"`.
fn quote_value(value: &str) -> String {
    if !value.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\') {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

impl InventoryFormat for IniInventory {
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
        let mut out = String::new();
        for (group, hosts) in &self.groups {
            out.push_str(&format!("[{}]\n", group));
            for host in hosts {
                out.push_str(&self.host_line(host));
                out.push('\n');
            }
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FieldValue;

    fn web() -> GroupedHosts {
        let mut grouped = GroupedHosts::new();
        grouped.insert("web".to_string(), vec!["h1".to_string(), "h2".to_string()]);
        grouped
    }

    fn vars() -> HostVars {
        let mut host_vars = HostVars::new();
        host_vars
            .entry("h1".to_string())
            .or_default()
            .insert("ip".to_string(), FieldValue::from("10.0.0.1"));
        host_vars
    }

    #[test]
    fn test_serialize_with_vars() {
        let mut inv = IniInventory::new();
        inv.add_host_vars(&vars());
        inv.add_grouped_data(&web());

        let text = inv.serialize().unwrap();
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines, vec!["[web]", "h1 ip=10.0.0.1", "h2", "", ""]);
    }

    #[test]
    fn test_vars_added_after_groups_still_annotate() {
        let mut inv = IniInventory::new();
        inv.add_grouped_data(&web());
        inv.add_host_vars(&vars());

        assert_eq!(inv.serialize().unwrap(), "[web]\nh1 ip=10.0.0.1\nh2\n\n");
    }

    #[test]
    fn test_groups_in_accumulation_order() {
        let mut inv = IniInventory::new();
        let mut first = GroupedHosts::new();
        first.insert("db".to_string(), vec!["d1".to_string()]);
        inv.add_grouped_data(&first);
        inv.add_grouped_data(&web());

        assert_eq!(inv.serialize().unwrap(), "[db]\nd1\n\n[web]\nh1\nh2\n\n");
    }

    #[test]
    fn test_multiple_vars_on_one_line() {
        let mut host_vars = vars();
        host_vars["h1"].insert("port".to_string(), FieldValue::Int(22));

        let mut inv = IniInventory::new();
        inv.add_host_vars(&host_vars);
        inv.add_grouped_data(&web());

        assert!(inv.serialize().unwrap().contains("h1 ip=10.0.0.1 port=22\n"));
    }

    #[test]
    fn test_values_with_spaces_are_quoted() {
        let mut host_vars = vars();
        host_vars["h1"].insert("desc".to_string(), FieldValue::from("web server"));
        host_vars["h1"].insert("note".to_string(), FieldValue::from(r#"say "hi""#));

        let mut inv = IniInventory::new();
        inv.add_host_vars(&host_vars);
        inv.add_grouped_data(&web());

        let text = inv.serialize().unwrap();
        assert!(text.contains(r#"h1 ip=10.0.0.1 desc="web server" note="say \"hi\"""#));
        assert!(text.contains("\nh2\n"));
    }

    #[test]
    fn test_empty_inventory_serializes_to_nothing() {
        assert_eq!(IniInventory::new().serialize().unwrap(), "");
    }
}
