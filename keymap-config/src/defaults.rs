//! Default values used as `#[serde(default = "...")]` attributes on `KeymapConfig`.

use crate::types::{KeyBinding, KeysConfig};

// ── Paths ──────────────────────────────────────────────────────────────────

/// Directory name under `~/.config`.
pub const CONFIG_DIR_NAME: &str = "keymap";

/// File name of the default keymap config.
pub const CONFIG_FILE_NAME: &str = "keymap.yaml";

// ── Keybindings ────────────────────────────────────────────────────────────

/// Bindings written into a freshly created config so the file is self-documenting.
pub fn bindings() -> Vec<KeyBinding> {
    vec![
        KeyBinding {
            keys: KeysConfig::from("CommandOrControl+s"),
            action: "save".to_string(),
            desc: Some("Save the current document".to_string()),
        },
        KeyBinding {
            keys: KeysConfig::Many(vec![
                "CommandOrControl+y".to_string(),
                "CommandOrControl+Shift+z".to_string(),
            ]),
            action: "redo".to_string(),
            desc: Some("Redo the last undone change".to_string()),
        },
        KeyBinding {
            keys: KeysConfig::from("Escape"),
            action: "cancel".to_string(),
            desc: None,
        },
    ]
}
