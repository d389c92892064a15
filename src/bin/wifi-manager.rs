//! Wi-Fi Manager Demo
//!
//! Keeps a Wi-Fi profile configuration in a durable store and drives it
//! through the property bridge from the command line. Change notifications
//! are printed to stdout.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use treestore::config::{ConfigLoader, TreestoreConfig};
use treestore::logging::init_logging;
use treestore::{Bridge, Diagnostics, SaveOutcome, Store, ValueMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
enum Security {
    Wep,
    Wpa,
    Wpa2,
    #[default]
    Wpa3,
}

treestore::scalar_node!(Security);

#[derive(Debug, Clone, PartialEq, Default)]
struct Profile {
    name: String,
    ssid: Vec<u8>,
    psk: Vec<u8>,
    mode: Security,
}

treestore::record!(Profile { name, ssid, psk, mode });

#[derive(Debug, Clone, PartialEq)]
struct WifiConfig {
    country: String,
    selected_profile: Option<u32>,
    profiles: BTreeMap<u32, Profile>,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            selected_profile: None,
            profiles: BTreeMap::new(),
        }
    }
}

treestore::record!(WifiConfig { country, selected_profile, profiles });

#[derive(Parser, Debug)]
#[command(name = "wifi-manager", about = "Demo Wi-Fi profile manager backed by treestore")]
struct Cli {
    /// Configuration document (overrides store.document from the config file)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Treestore config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the document with indentation
    #[arg(long, global = true)]
    pretty: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the JSON value at a path
    Get { path: String },
    /// Print every published value
    GetAll,
    /// Set the value at a path from JSON text
    Set { path: String, value: String },
    /// Add or replace a profile
    AddProfile {
        id: u32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        ssid: String,
        #[arg(long)]
        psk: String,
        #[arg(long, value_enum, default_value_t = Security::Wpa3)]
        mode: Security,
    },
    /// Select the active profile
    Select { id: u32 },
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Wi-Fi manager starting");

    if let Err(e) = run(&cli, &config) {
        error!("Command failed: {:#}", e);
        eprintln!("{:#}", e);
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<TreestoreConfig> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => ConfigLoader::load(&std::env::current_dir()?)?,
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    Ok(config)
}

fn print_changes(values: &ValueMap) {
    println!("values_changed:");
    for (path, value) in values {
        println!("  {} = {}", path, value);
    }
}

fn run(cli: &Cli, config: &TreestoreConfig) -> Result<()> {
    let path = cli
        .file
        .clone()
        .unwrap_or_else(|| config.store.document.clone());
    let diagnostics = Diagnostics::new(|msg| eprintln!("config error: {}", msg));
    let options = config
        .store
        .options(diagnostics.clone())
        .with_pretty(cli.pretty || config.store.pretty);

    let mut store: Store<WifiConfig> = Store::open(&path, options);
    let bridge = Bridge::new()
        .with_diagnostics(diagnostics)
        .with_signal(print_changes)
        .on_set(|path| info!(path, "Configuration updated"));

    if store.profiles.is_empty() {
        store.profiles.insert(
            42,
            Profile {
                name: "Work".to_string(),
                ssid: b"Initech".to_vec(),
                psk: b"Stapler".to_vec(),
                mode: Security::Wpa3,
            },
        );
        store.selected_profile = Some(42);
        persist(&mut store)?;
        apply(store.root());
    }

    match &cli.command {
        Command::Get { path } => println!("{}", bridge.get(store.root(), path)?),
        Command::GetAll => {
            for (path, value) in bridge.get_all(store.root()) {
                println!("{} = {}", path, value);
            }
        }
        Command::Set { path, value } => {
            bridge.set(store.root_mut(), path, value)?;
            persist(&mut store)?;
            apply(store.root());
            bridge.values_changed_at(store.root(), &[path.as_str()])?;
        }
        Command::AddProfile {
            id,
            name,
            ssid,
            psk,
            mode,
        } => {
            store.profiles.insert(
                *id,
                Profile {
                    name: name.clone(),
                    ssid: ssid.as_bytes().to_vec(),
                    psk: psk.as_bytes().to_vec(),
                    mode: *mode,
                },
            );
            persist(&mut store)?;
            bridge.values_changed(store.root(), &[&store.profiles])?;
        }
        Command::Select { id } => {
            if !store.profiles.contains_key(id) {
                bail!("no profile with id {}", id);
            }
            store.selected_profile = Some(*id);
            persist(&mut store)?;
            apply(store.root());
            bridge.values_changed(store.root(), &[&store.selected_profile])?;
        }
    }

    Ok(())
}

fn persist(store: &mut Store<WifiConfig>) -> Result<()> {
    let outcome = store
        .save()
        .with_context(|| format!("saving {}", store.path().display()))?;
    match outcome {
        SaveOutcome::Written => info!(path = ?store.path(), "Configuration saved"),
        SaveOutcome::Unchanged => info!("Configuration unchanged"),
        SaveOutcome::Removed | SaveOutcome::Absent => info!("Configuration at defaults"),
    }
    Ok(())
}

fn apply(config: &WifiConfig) {
    match config
        .selected_profile
        .and_then(|id| config.profiles.get(&id).map(|p| (id, p)))
    {
        Some((id, profile)) => info!(
            id,
            name = %profile.name,
            mode = ?profile.mode,
            "Applying configuration"
        ),
        None => info!("Applying configuration: no profile selected"),
    }
}
