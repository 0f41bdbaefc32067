//! nomnom-inventory CLI - Ansible dynamic inventory script
//!
//! Ansible calls this with `--list` for the full inventory and `--host <name>`
//! for per-host variables. Host variables are embedded in `--list` under
//! `_meta.hostvars`, so `--host` always answers with an empty object.

use clap::{ArgGroup, Parser};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use nomnom_inventory::{Inventory, InventoryError};

const CONFIG_ENV: &str = "NOMNOM_INVENTORY_CONFIG";
const DEFAULT_CONFIG: &str = "inv.yml";

#[derive(Parser)]
#[command(name = "nomnom-inventory")]
#[command(version, about = "Dynamic Ansible inventory built from SQL queries", long_about = None)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .multiple(true)
        .args(["list", "host", "output"])
))]
struct Cli {
    /// Run every input and emit every output
    #[arg(long)]
    list: bool,

    /// Print variables for one host (always empty, see --list)
    #[arg(long, value_name = "HOST", conflicts_with_all = ["list", "output"])]
    host: Option<String>,

    /// Emit only the named output
    #[arg(short, long, value_name = "NAME")]
    output: Option<String>,

    /// Path to the inventory YAML config
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Determine config path with precedence: CLI > ENV > next to the executable
fn detect_config_path(cli_override: Option<PathBuf>) -> PathBuf {
    // 1. CLI flag (highest priority)
    if let Some(path) = cli_override {
        return path;
    }

    // 2. Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }

    // 3. inv.yml one level above the executable's directory
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().and_then(|dir| dir.parent()).map(|dir| dir.join(DEFAULT_CONFIG)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}

fn main() {
    // Logs go to stderr so stdout carries only the inventory
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), InventoryError> {
    if let Some(host) = cli.host {
        tracing::debug!("Host vars requested for '{}'; served through --list", host);
        println!("{{}}");
        return Ok(());
    }

    let config = detect_config_path(cli.config);
    tracing::info!("Loading inventory config from {}", config.display());

    let mut inventory = Inventory::load_from_file(&config)?;
    if let Some(name) = &cli.output {
        inventory.restrict_to(name)?;
    }

    let stdout = io::stdout();
    let mut lock = stdout.lock();
    inventory.run(&mut lock)
}
