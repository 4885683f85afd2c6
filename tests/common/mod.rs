//! Shared integration test helpers for keymap.
//!
//! Include with `mod common;` at the top of a test file.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A small config exercising lists, descriptions and a forced platform.
pub const SAMPLE_YAML: &str = r#"
strategy: recordCompose
platform: darwin
bindings:
  - keys: CommandOrControl+s
    action: save
    desc: Save the document
  - keys: [CommandOrControl+y, CommandOrControl+Shift+z]
    action: redo
  - keys: Escape
    action: cancel
"#;

/// Write `contents` to `name` inside a fresh temp dir.
///
/// The `TempDir` must be kept alive until the file has been read.
pub fn write_config(name: &str, contents: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write config");
    (path, temp_dir)
}
