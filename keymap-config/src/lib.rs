//! Configuration system for keymap.
//!
//! This crate provides the serde data model behind a keymap file:
//!
//! - The tracking strategy selector (`recordAll` / `recordCompose`)
//! - Key binding entries (a key string or a list of alternatives, an action, a description)
//! - An optional replacement alias table
//! - An optional platform identifier override for macOS detection
//!
//! Loading and saving live in [`config`]; default values in [`defaults`].

pub mod config;
pub mod defaults;
mod error;
mod types;

pub use config::KeymapConfig;
pub use error::ConfigError;
pub use types::{KeyBinding, KeymapStrategy, KeysConfig};
