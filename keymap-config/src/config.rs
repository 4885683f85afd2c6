//! `KeymapConfig`: loading, saving and path resolution.

use crate::error::ConfigError;
use crate::types::{KeyBinding, KeymapStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk description of a keymap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeymapConfig {
    /// Which tracking strategy the registry activates.
    pub strategy: KeymapStrategy,

    /// Replacement alias table (alias -> canonical key). `None` keeps the built-in table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_alias_map: Option<BTreeMap<String, String>>,

    /// Platform identifier used for macOS detection instead of the host's own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    /// Key bindings, in registration order.
    pub bindings: Vec<KeyBinding>,
}

enum Format {
    Yaml,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("toml") => Ok(Format::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl KeymapConfig {
    /// Load the config at [`KeymapConfig::config_path`], or the built-in defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        log::info!("Keymap config path: {:?}", config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::info!("Keymap config not found, using default bindings");
            Ok(Self {
                bindings: crate::defaults::bindings(),
                ..Self::default()
            })
        }
    }

    /// Load a config file; the format is chosen by extension (`.yaml`/`.yml`/`.toml`).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let format = Format::from_path(path)?;
        log::info!("Loading keymap config from {:?}", path);
        let contents = fs::read_to_string(path)?;
        let config = match format {
            Format::Yaml => Self::from_yaml_str(&contents)?,
            Format::Toml => Self::from_toml_str(&contents)?,
        };
        log::info!(
            "Loaded keymap config with {} binding(s), strategy {}",
            config.bindings.len(),
            config.strategy
        );
        Ok(config)
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_str(contents)?)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Get the configuration file path (using XDG convention): `~/.config/keymap/keymap.yaml`
    pub fn config_path() -> PathBuf {
        match dirs::home_dir() {
            Some(home_dir) => home_dir
                .join(".config")
                .join(crate::defaults::CONFIG_DIR_NAME)
                .join(crate::defaults::CONFIG_FILE_NAME),
            // Fallback if home directory cannot be determined
            None => PathBuf::from(crate::defaults::CONFIG_FILE_NAME),
        }
    }
}
