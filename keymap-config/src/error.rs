//! Typed error variants for the keymap-config crate.
//!
//! Callers that only want a message can coerce these into `anyhow::Error`;
//! callers that care about the failure mode can match on the variant.

use std::path::PathBuf;

/// Errors that can occur when loading or saving a keymap configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error reading keymap config: {0}")]
    Io(#[from] std::io::Error),

    /// The file contained invalid YAML.
    #[error("YAML parse error in keymap config: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The file contained invalid TOML.
    #[error("TOML parse error in keymap config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The file extension is neither YAML nor TOML.
    #[error("Unsupported keymap config format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}
