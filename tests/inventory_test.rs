//! Integration tests for the inventory pipeline, driven by static inputs

use nomnom_inventory::{Inventory, InventoryError};
use serde_json::{json, Value};
use std::fs;

fn run_to_string(config: &str) -> Result<String, InventoryError> {
    let inventory = Inventory::from_yaml_str(config)?;
    let mut stdout = Vec::new();
    inventory.run(&mut stdout)?;
    Ok(String::from_utf8(stdout).expect("utf-8 output"))
}

#[test]
fn test_json_inventory_with_host_vars() {
    let config = r#"
Input:
  servers:
    type: static
    group_field: web
    host_field: name
    host_vars:
      - column: ip
        var: ip
    rows:
      - { name: h1, ip: 10.0.0.1 }
      - { name: h2 }
Output:
  ansible:
    type: AnsibleJSON
"#;

    let text = run_to_string(config).unwrap();
    let parsed: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(
        parsed,
        json!({
            "web": {"hosts": ["h1", "h2"]},
            "_meta": {"hostvars": {"h1": {"ip": "10.0.0.1"}, "h2": {}}}
        })
    );
}

#[test]
fn test_ini_inventory_with_host_vars() {
    let config = r#"
Input:
  servers:
    type: static
    group_field: web
    host_field: name
    host_vars:
      - column: ip
        var: ip
    rows:
      - { name: h1, ip: 10.0.0.1 }
      - { name: h2 }
Output:
  ini:
    type: AnsibleINI
"#;

    let text = run_to_string(config).unwrap();
    // h2 has an entry with no variables, so its line is bare
    assert_eq!(text, "[web]\nh1 ip=10.0.0.1\nh2\n\n");
}

#[test]
fn test_transform_groups_hosts_by_extracted_site() {
    let config = r#"
Input:
  servers:
    type: static
    transform:
      - field: hostname
        regex: '([a-z]+)-'
        out: site
    group_field: "dc_{{ site }}"
    host_field: hostname
    rows:
      - { hostname: ams-web-01 }
      - { hostname: localhost }
      - { hostname: lon-web-01 }
      - { hostname: ams-db-01 }
Output:
  ansible:
    type: AnsibleJSON
"#;

    let parsed: Value = serde_json::from_str(&run_to_string(config).unwrap()).unwrap();
    assert_eq!(parsed["dc_ams"]["hosts"], json!(["ams-web-01", "ams-db-01"]));
    assert_eq!(parsed["dc_lon"]["hosts"], json!(["lon-web-01"]));
    assert!(parsed.get("dc_localhost").is_none());
}

#[test]
fn test_multiple_inputs_merge_into_one_output() {
    let config = r#"
Input:
  servers:
    type: static
    group_field: "{{ role }}"
    host_field: name
    rows:
      - { name: web1, role: web }
      - { name: db1, role: db }
  appliances:
    use: servers
    rows:
      - { name: lb1, role: lb }
Output:
  ini:
    type: AnsibleINI
"#;

    let text = run_to_string(config).unwrap();
    assert_eq!(text, "[web]\nweb1\n\n[db]\ndb1\n\n[lb]\nlb1\n\n");
}

#[test]
fn test_host_in_several_groups() {
    let config = r#"
Input:
  services:
    type: static
    group_field: "{{ role }}"
    host_field: name
    rows:
      - { name: app1, role: web }
      - { name: app1, role: worker }
      - { name: app2, role: web }
Output:
  ansible:
    type: AnsibleJSON
"#;

    let text = run_to_string(config).unwrap();
    let parsed: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(parsed["web"]["hosts"], json!(["app1", "app2"]));
    assert_eq!(parsed["worker"]["hosts"], json!(["app1"]));
}

#[test]
fn test_missing_transform_field_is_fatal() {
    let config = r#"
Input:
  servers:
    type: static
    group_field: all
    host_field: name
    transform:
      - { field: missing, regex: '(.*)', out: x }
    rows:
      - { name: a }
      - { name: b }
Output:
  ansible:
    type: AnsibleJSON
"#;

    let result = run_to_string(config);
    assert!(matches!(result, Err(InventoryError::Configuration(ref m)) if m.contains("missing")));
}

#[test]
fn test_unresolved_template_field_is_fatal() {
    let config = r#"
Input:
  servers:
    type: static
    group_field: "{{ rack }}"
    host_field: name
    rows:
      - { name: a }
Output:
  ansible:
    type: AnsibleJSON
"#;

    assert!(matches!(run_to_string(config), Err(InventoryError::Template { .. })));
}

#[test]
fn test_failed_input_emits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.json");

    let config = format!(
        r#"
Input:
  good:
    type: static
    group_field: all
    host_field: name
    rows:
      - {{ name: a }}
  bad:
    type: static
    group_field: all
    host_field: fqdn
    rows:
      - {{ name: b }}
Output:
  ansible:
    type: AnsibleJSON
    file: {}
"#,
        path.display()
    );

    let result = run_to_string(&config);
    assert!(matches!(result, Err(InventoryError::Lookup(_))));
    assert!(!path.exists());
}

#[test]
fn test_restricted_run_emits_only_selected_output() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("inventory.json");
    let ini_path = dir.path().join("hosts.ini");

    let config = format!(
        r#"
Input:
  servers:
    type: static
    group_field: all
    host_field: name
    rows:
      - {{ name: a }}
Output:
  json:
    type: AnsibleJSON
    file: {}
  ini:
    type: AnsibleINI
    file: {}
  console:
    type: AnsibleJSON
"#,
        json_path.display(),
        ini_path.display()
    );

    let mut inventory = Inventory::from_yaml_str(&config).unwrap();
    inventory.restrict_to("ini").unwrap();
    assert_eq!(inventory.output_names().collect::<Vec<_>>(), vec!["ini"]);

    let mut stdout = Vec::new();
    inventory.run(&mut stdout).unwrap();

    assert!(stdout.is_empty());
    assert!(!json_path.exists());
    assert_eq!(fs::read_to_string(&ini_path).unwrap(), "[all]\na\n\n");
}

#[test]
fn test_unrestricted_run_emits_all_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("inventory.json");

    let config = format!(
        r#"
Input:
  servers:
    type: static
    group_field: all
    host_field: name
    rows:
      - {{ name: a }}
Output:
  json:
    type: AnsibleJSON
    file: {}
  ini:
    type: AnsibleINI
"#,
        json_path.display()
    );

    let text = run_to_string(&config).unwrap();
    assert_eq!(text, "[all]\na\n\n");

    let parsed: Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed["all"]["hosts"], json!(["a"]));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inv.yml");
    fs::write(
        &path,
        "Input:\n  s:\n    type: static\n    group_field: g\n    host_field: n\n    rows: [{ n: x }]\nOutput:\n  o:\n    type: AnsibleINI\n",
    )
    .unwrap();

    let inventory = Inventory::load_from_file(&path).unwrap();
    let mut stdout = Vec::new();
    inventory.run(&mut stdout).unwrap();
    assert_eq!(String::from_utf8(stdout).unwrap(), "[g]\nx\n\n");

    let missing = Inventory::load_from_file(dir.path().join("nope.yml"));
    assert!(matches!(missing, Err(InventoryError::Configuration(_))));
}
