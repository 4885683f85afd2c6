//! Command-line interface for keymap.
//!
//! Subcommands inspect a keymap config without a browser: list its entries,
//! show how strings normalize, and replay a scripted key event sequence.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use keymap_config::KeymapConfig;
use keymap_keybindings::{
    AliasMap, EventBus, EventTarget, Handler, KeyEvent, Keymap, KeymapOptions, PlatformDetector,
    normalize,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// keymap - inspect and exercise keyboard shortcut maps
#[derive(Parser, Debug)]
#[command(name = "keymap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (off, error, warn, info, debug, trace); overrides DEBUG_LEVEL
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<log::LevelFilter>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every entry of a keymap config
    List {
        /// Config file (.yaml/.yml/.toml); defaults to ~/.config/keymap/keymap.yaml
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Print JSON snapshots instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the alias table in effect for a keymap config
    Aliases {
        /// Config file (.yaml/.yml/.toml); defaults to ~/.config/keymap/keymap.yaml
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Print a JSON object instead of one alias per line
        #[arg(long)]
        json: bool,
    },
    /// Show the canonical string and key tokens of combination strings
    Normalize {
        /// Combination strings, e.g. "CommandOrControl+s"
        #[arg(required = true)]
        keys: Vec<String>,

        /// Platform identifier used for macOS detection (e.g. "darwin")
        #[arg(long, value_name = "ID")]
        platform: Option<String>,
    },
    /// Dispatch key events to a keymap and print the actions that fire
    Replay {
        /// Config file (.yaml/.yml/.toml); defaults to ~/.config/keymap/keymap.yaml
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Events: down:KEY, up:KEY or blur (e.g. down:Control down:s)
        #[arg(required = true)]
        events: Vec<String>,
    },
}

/// Parse `down:KEY`, `up:KEY` or `blur`.
pub fn parse_event(spec: &str) -> Result<KeyEvent> {
    if spec == "blur" {
        return Ok(KeyEvent::blur());
    }
    match spec.split_once(':') {
        Some(("down", key)) if !key.is_empty() => Ok(KeyEvent::key_down(key)),
        Some(("up", key)) if !key.is_empty() => Ok(KeyEvent::key_up(key)),
        _ => bail!("invalid event '{spec}': expected down:KEY, up:KEY or blur"),
    }
}

/// Load `path`, or the default config location when `None`.
pub fn load_config(path: Option<&Path>) -> Result<KeymapConfig> {
    match path {
        Some(path) => KeymapConfig::load_from(path)
            .with_context(|| format!("failed to load keymap config {}", path.display())),
        None => KeymapConfig::load().context("failed to load default keymap config"),
    }
}

/// The alias table a registry built from `config` uses, sorted by alias.
pub fn alias_table(config: &KeymapConfig) -> BTreeMap<String, String> {
    match &config.key_alias_map {
        Some(aliases) => AliasMap::from(aliases.clone()).to_btree(),
        None => AliasMap::default().to_btree(),
    }
}

/// Build a registry on `bus` where every action records its name into `fired`.
pub fn build_keymap(
    config: &KeymapConfig,
    bus: Rc<EventBus>,
    fired: Rc<RefCell<Vec<String>>>,
) -> Keymap {
    let window: Rc<dyn EventTarget> = bus;
    let options = KeymapOptions::default().with_window(window);
    let keymap = Keymap::from_config(config, options, |action| {
        let action = action.to_string();
        let fired = Rc::clone(&fired);
        let handler: Handler = Rc::new(move |_: Option<&KeyEvent>| {
            log::info!("Action fired: {}", action);
            fired.borrow_mut().push(action.clone());
        });
        Some(handler)
    });
    keymap.log_table();
    keymap
}

/// Dispatch `events` in order and return the actions fired, in order.
pub fn replay(config: &KeymapConfig, events: &[KeyEvent]) -> Vec<String> {
    let bus = Rc::new(EventBus::new());
    let fired = Rc::new(RefCell::new(Vec::new()));
    let _keymap = build_keymap(config, Rc::clone(&bus), Rc::clone(&fired));

    for event in events {
        bus.dispatch(event);
    }
    fired.take()
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::List { config, json } => {
            let config = load_config(config.as_deref())?;
            let keymap = build_keymap(
                &config,
                Rc::new(EventBus::new()),
                Rc::new(RefCell::new(Vec::new())),
            );
            if json {
                let snapshots = keymap.list();
                println!("{}", serde_json::to_string_pretty(&snapshots)?);
            } else {
                println!("{}", keymap.table());
            }
        }
        Commands::Aliases { config, json } => {
            let config = load_config(config.as_deref())?;
            let table = alias_table(&config);
            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                for (alias, canonical) in &table {
                    println!("{alias:?} -> {canonical:?}");
                }
            }
        }
        Commands::Normalize { keys, platform } => {
            let platform = platform
                .map(PlatformDetector::new)
                .unwrap_or_else(PlatformDetector::from_env);
            let aliases = AliasMap::default();
            for raw in &keys {
                let normalized = normalize(raw, &aliases, &platform);
                println!(
                    "{:?} -> {:?} {:?}",
                    raw, normalized.canonical, normalized.tokens
                );
            }
        }
        Commands::Replay { config, events } => {
            let config = load_config(config.as_deref())?;
            let events = events
                .iter()
                .map(|e| parse_event(e))
                .collect::<Result<Vec<_>>>()?;
            for action in replay(&config, &events) {
                println!("{action}");
            }
        }
    }
    Ok(())
}
