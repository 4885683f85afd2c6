//! Configuration types and enums.

use serde::{Deserialize, Serialize};

// ============================================================================
// Strategy Types
// ============================================================================

/// Event-tracking policy used to reconstruct held keys from keydown/keyup/blur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeymapStrategy {
    /// Remember every physical key that is currently down.
    #[serde(rename = "recordAll")]
    RecordAll,
    /// Remember only held modifiers; the non-modifier key is taken from the keydown itself.
    ///
    /// With a meta key held, macOS never emits keyup for the other key, so this
    /// strategy avoids leaving ordinary keys stuck down.
    #[default]
    #[serde(rename = "recordCompose")]
    RecordCompose,
}

impl KeymapStrategy {
    /// Name as written in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            KeymapStrategy::RecordAll => "recordAll",
            KeymapStrategy::RecordCompose => "recordCompose",
        }
    }
}

impl std::fmt::Display for KeymapStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Keybinding Types
// ============================================================================

/// Key combination(s) of a binding: either one string or a list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeysConfig {
    /// A single combination, e.g. `"CmdOrCtrl+S"`
    One(String),
    /// Several combinations sharing one action, e.g. `["Ctrl+Y", "Ctrl+Shift+Z"]`
    Many(Vec<String>),
}

impl From<&str> for KeysConfig {
    fn from(value: &str) -> Self {
        KeysConfig::One(value.to_string())
    }
}

/// A keybinding configuration entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Key combination string(s), e.g., "CommandOrControl+s"
    pub keys: KeysConfig,
    /// Action name, e.g., "save_document"
    pub action: String,
    /// Human-readable description shown in listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}
