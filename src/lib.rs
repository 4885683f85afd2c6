// Library exports for the keymap CLI and its tests
//
// The registry itself lives in `keymap-keybindings` and the config file
// format in `keymap-config`; this crate adds the command-line surface and
// the stderr logging bridge.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod debug;

pub use keymap_config::{ConfigError, KeyBinding, KeymapConfig, KeymapStrategy, KeysConfig};
pub use keymap_keybindings::{
    AliasMap, EventBus, EventKind, EventTarget, Handler, KeyEvent, KeyMapSnapshot, KeyMapSpec,
    Keymap, KeymapError, KeymapOptions, Keys, PlatformDetector, normalize,
};
