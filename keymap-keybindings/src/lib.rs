//! Keyboard shortcut registry.
//!
//! Binds human-readable key combination strings (`"Control+a"`,
//! `"CommandOrControl+s"`) to handlers, listens to key events on an
//! [`EventTarget`], and runs the matching handler when a combination is pressed.
//!
//! Features:
//! - Alias spellings and glyphs (`ctrl`, `esc`, `⌘`, `⌥`, ...) normalized to canonical keys
//! - `MetaOrControl` / `mod`: Meta on macOS, Control elsewhere
//! - Order-independent matching (`Shift+Control+a` is `Control+Shift+a`)
//! - Two tracking strategies for reconstructing held keys (see [`matcher`])

mod binding;
#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod event;
pub mod matcher;
pub mod parser;
pub mod platform;

pub use binding::{Handler, KeyMapSnapshot, KeyMapSpec, Keys, RegisteredEntry};
pub use event::{EventBus, EventKind, EventTarget, KeyEvent, Listener, ListenerId};
pub use keymap_config::KeymapStrategy;
pub use matcher::Subscription;
pub use parser::{NormalizedKeys, normalize};
pub use platform::{AliasMap, PlatformDetector};

use keymap_config::KeymapConfig;
use matcher::SharedEntries;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Errors raised by the registry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeymapError {
    /// `add` was called after `destroy`.
    #[error("keymap registry has been destroyed")]
    Destroyed,
}

/// Construction options. Every field is optional.
#[derive(Default)]
pub struct KeymapOptions {
    /// Element whose keydown/keyup are observed. Defaults to the global window.
    pub el: Option<Rc<dyn EventTarget>>,
    /// Global scope whose blur clears held keys. Defaults to the global window.
    pub window: Option<Rc<dyn EventTarget>>,
    pub strategy: KeymapStrategy,
    /// Alias table. Defaults to the built-in table.
    pub key_alias_map: Option<AliasMap>,
    /// macOS detection. Defaults to the host's identifier.
    pub platform: Option<PlatformDetector>,
}

impl KeymapOptions {
    pub fn with_el(mut self, el: Rc<dyn EventTarget>) -> Self {
        self.el = Some(el);
        self
    }

    pub fn with_window(mut self, window: Rc<dyn EventTarget>) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_strategy(mut self, strategy: KeymapStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_key_alias_map(mut self, aliases: AliasMap) -> Self {
        self.key_alias_map = Some(aliases);
        self
    }

    pub fn with_platform(mut self, platform: PlatformDetector) -> Self {
        self.platform = Some(platform);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Active,
    Destroyed,
}

/// Registry of shortcuts bound to an event source.
///
/// Entries are read live by the active tracking strategy, so `add`/`remove`
/// take effect on the next event. Dropping the registry detaches its listeners.
pub struct Keymap {
    entries: SharedEntries,
    aliases: AliasMap,
    platform: PlatformDetector,
    strategy: KeymapStrategy,
    subscription: Subscription,
    state: State,
}

impl Keymap {
    /// Registry on the global window with default options.
    pub fn new(specs: impl IntoIterator<Item = KeyMapSpec>) -> Self {
        Self::with_options(KeymapOptions::default(), specs)
    }

    /// Normalize `specs` and activate the chosen strategy.
    ///
    /// Combinations already present are dropped with a warning; the first wins.
    pub fn with_options(
        options: KeymapOptions,
        specs: impl IntoIterator<Item = KeyMapSpec>,
    ) -> Self {
        let KeymapOptions {
            el,
            window,
            strategy,
            key_alias_map,
            platform,
        } = options;

        let window = window.unwrap_or_else(event::default_window);
        let el = el.unwrap_or_else(|| Rc::clone(&window));
        let entries: SharedEntries = Rc::new(RefCell::new(Vec::new()));
        let subscription = Subscription::activate(
            el,
            window,
            matcher::tracker_for(strategy),
            Rc::clone(&entries),
        );

        let mut keymap = Self {
            entries,
            aliases: key_alias_map.unwrap_or_default(),
            platform: platform.unwrap_or_default(),
            strategy,
            subscription,
            state: State::Active,
        };

        for spec in specs {
            keymap.insert_spec(&spec);
        }

        log::info!(
            "Keymap initialized with {} entries (strategy {})",
            keymap.len(),
            strategy
        );
        keymap
    }

    /// Build from a config file's bindings.
    ///
    /// `handler_for` maps each binding's action name to its handler; bindings
    /// whose action is unknown are logged and skipped. The config's strategy,
    /// alias table and platform override `options`.
    pub fn from_config<F>(config: &KeymapConfig, options: KeymapOptions, mut handler_for: F) -> Self
    where
        F: FnMut(&str) -> Option<Handler>,
    {
        let mut options = options.with_strategy(config.strategy);
        if let Some(aliases) = &config.key_alias_map {
            options.key_alias_map = Some(AliasMap::from(aliases.clone()));
        }
        if let Some(platform) = &config.platform {
            options.platform = Some(PlatformDetector::new(platform.as_str()));
        }

        let mut specs = Vec::with_capacity(config.bindings.len());
        for binding in &config.bindings {
            match handler_for(&binding.action) {
                Some(handler) => specs.push(KeyMapSpec {
                    keys: Keys::from(&binding.keys),
                    handler,
                    desc: binding.desc.clone(),
                }),
                None => {
                    log::warn!(
                        "Unknown action '{}' for keys '{}', skipping",
                        binding.action,
                        Keys::from(&binding.keys)
                    );
                }
            }
        }

        Self::with_options(options, specs)
    }

    fn normalize(&self, keys: &str) -> NormalizedKeys {
        parser::normalize(keys, &self.aliases, &self.platform)
    }

    /// Insert every combination of `spec` not already present. Returns how many were added.
    fn insert_spec(&mut self, spec: &KeyMapSpec) -> usize {
        let mut added = 0;
        for raw in spec.keys.iter() {
            if self.find_index(raw).is_some() {
                log::warn!(
                    "Duplicate keybinding '{}' ignored",
                    parser::canonicalize(raw)
                );
                continue;
            }
            let entry = RegisteredEntry::new(spec, raw, self.normalize(raw));
            self.entries.borrow_mut().push(entry);
            added += 1;
        }
        added
    }

    /// Index of the first entry `keys` refers to.
    ///
    /// An entry matches on its exact raw string, its canonical string, or its
    /// token set; entries are scanned in order and the first match wins.
    fn find_index(&self, keys: &str) -> Option<usize> {
        let normalized = self.normalize(keys);
        self.entries.borrow().iter().position(|e| {
            e.raw == keys
                || e.canonical == normalized.canonical
                || parser::same_keys(&e.tokens, &normalized.tokens)
        })
    }

    /// Run the handler bound to `keys`, if any.
    pub fn trigger(&self, keys: &str) {
        self.trigger_with_event(keys, None);
    }

    /// Run the handler bound to `keys`, passing `event` along.
    pub fn trigger_with_event(&self, keys: &str, event: Option<&KeyEvent>) {
        let handler = self
            .find_index(keys)
            .map(|index| Rc::clone(&self.entries.borrow()[index].handler));
        if let Some(handler) = handler {
            handler(event);
        }
    }

    pub fn has(&self, keys: &str) -> bool {
        self.find_index(keys).is_some()
    }

    /// Register `spec`. Returns how many of its combinations were new (possibly 0).
    pub fn add(&mut self, spec: KeyMapSpec) -> Result<usize, KeymapError> {
        if self.state == State::Destroyed {
            return Err(KeymapError::Destroyed);
        }
        Ok(self.insert_spec(&spec))
    }

    /// Remove the entry `keys` refers to, if any.
    pub fn remove(&mut self, keys: &str) {
        if let Some(index) = self.find_index(keys) {
            let removed = self.entries.borrow_mut().remove(index);
            log::debug!("Removed keybinding '{}'", removed.canonical);
        }
    }

    /// Detach listeners and drop every entry. The registry stays usable for `add`.
    pub fn clear(&mut self) {
        self.subscription.cancel();
        self.entries.borrow_mut().clear();
    }

    /// Detach listeners, drop every entry, and refuse further `add`s.
    pub fn destroy(&mut self) {
        self.clear();
        self.state = State::Destroyed;
        log::debug!("Keymap destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == State::Destroyed
    }

    /// Is the tracking strategy still attached to its event source?
    pub fn is_listening(&self) -> bool {
        self.subscription.is_active()
    }

    /// Handler-free copies of every entry.
    pub fn list(&self) -> Vec<KeyMapSnapshot> {
        self.entries
            .borrow()
            .iter()
            .map(RegisteredEntry::snapshot)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn strategy(&self) -> KeymapStrategy {
        self.strategy
    }

    /// A copy of the active alias table. Editing it changes nothing.
    pub fn key_alias_map(&self) -> AliasMap {
        self.aliases.clone()
    }

    /// Replace the alias table and re-normalize every entry from its raw input.
    pub fn set_key_alias_map(&mut self, aliases: AliasMap) {
        self.aliases = aliases;
        self.renormalize();
    }

    pub fn platform(&self) -> &PlatformDetector {
        &self.platform
    }

    /// Replace the platform detector and re-normalize every entry from its raw input.
    pub fn set_platform(&mut self, platform: PlatformDetector) {
        self.platform = platform;
        self.renormalize();
    }

    fn renormalize(&mut self) {
        let normalized: Vec<NormalizedKeys> = self
            .entries
            .borrow()
            .iter()
            .map(|entry| self.normalize(&entry.raw))
            .collect();

        for (entry, keys) in self.entries.borrow_mut().iter_mut().zip(normalized) {
            entry.canonical = keys.canonical;
            entry.tokens = keys.tokens;
        }
    }

    /// Tabular dump of every entry: description, raw keys, resolved tokens.
    pub fn table(&self) -> String {
        const HEADERS: [&str; 3] = ["desc", "rawKeys", "keyList"];

        let rows: Vec<[String; 3]> = self
            .entries
            .borrow()
            .iter()
            .map(|entry| {
                [
                    entry.desc.clone().unwrap_or_default(),
                    entry.raw.clone(),
                    format!("{:?}", entry.tokens),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let format_row = |cells: [&str; 3]| {
            let padded: Vec<String> = cells
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect();
            format!("| {} |", padded.join(" | "))
        };

        let mut lines = vec![format_row(HEADERS)];
        lines.push(format!(
            "|{}|",
            widths
                .iter()
                .map(|w| "-".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("|")
        ));
        for row in &rows {
            lines.push(format_row([&row[0], &row[1], &row[2]]));
        }
        lines.join("\n")
    }

    /// Write [`Keymap::table`] to the log at info level.
    pub fn log_table(&self) {
        log::info!("Keymap entries:\n{}", self.table());
    }
}

impl fmt::Debug for Keymap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keymap")
            .field("entries", &self.entries.borrow())
            .field("strategy", &self.strategy)
            .field("platform", &self.platform)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
