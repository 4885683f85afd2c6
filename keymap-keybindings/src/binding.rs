//! Shortcut specs as supplied by callers and entries as stored by the registry.

use crate::event::KeyEvent;
use crate::parser::NormalizedKeys;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Callback run when a combination fires. Receives the originating event, if any.
pub type Handler = Rc<dyn Fn(Option<&KeyEvent>)>;

/// One combination string or an ordered list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keys {
    One(String),
    Many(Vec<String>),
}

impl Keys {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Keys::One(key) => std::slice::from_ref(key),
            Keys::Many(keys) => keys,
        };
        slice.iter().map(String::as_str)
    }
}

impl fmt::Display for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keys::One(key) => f.write_str(key),
            Keys::Many(keys) => write!(f, "[{}]", keys.join(", ")),
        }
    }
}

impl From<&str> for Keys {
    fn from(value: &str) -> Self {
        Keys::One(value.to_string())
    }
}

impl From<String> for Keys {
    fn from(value: String) -> Self {
        Keys::One(value)
    }
}

impl From<Vec<String>> for Keys {
    fn from(value: Vec<String>) -> Self {
        Keys::Many(value)
    }
}

impl From<Vec<&str>> for Keys {
    fn from(value: Vec<&str>) -> Self {
        Keys::Many(value.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Keys {
    fn from(value: [&str; N]) -> Self {
        Keys::Many(value.iter().map(|k| k.to_string()).collect())
    }
}

impl From<&keymap_config::KeysConfig> for Keys {
    fn from(value: &keymap_config::KeysConfig) -> Self {
        match value {
            keymap_config::KeysConfig::One(key) => Keys::One(key.clone()),
            keymap_config::KeysConfig::Many(keys) => Keys::Many(keys.clone()),
        }
    }
}

/// A shortcut to register: combination(s), handler and optional description.
#[derive(Clone)]
pub struct KeyMapSpec {
    pub keys: Keys,
    pub handler: Handler,
    pub desc: Option<String>,
}

impl KeyMapSpec {
    pub fn new(keys: impl Into<Keys>, handler: impl Fn(Option<&KeyEvent>) + 'static) -> Self {
        Self {
            keys: keys.into(),
            handler: Rc::new(handler),
            desc: None,
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }
}

impl fmt::Debug for KeyMapSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMapSpec")
            .field("keys", &self.keys)
            .field("desc", &self.desc)
            .finish_non_exhaustive()
    }
}

/// A normalized combination held by the registry.
///
/// A spec with several combinations expands to one entry per combination,
/// all sharing the [`KeyMapSpec`]'s handler and description.
#[derive(Clone)]
pub struct RegisteredEntry {
    /// The [`KeyMapSpec`] keys exactly as supplied (possibly a list).
    pub raw_keys: Keys,
    /// The single combination this entry was normalized from.
    pub raw: String,
    pub canonical: String,
    pub tokens: Vec<String>,
    pub handler: Handler,
    pub desc: Option<String>,
}

impl RegisteredEntry {
    pub(crate) fn new(spec: &KeyMapSpec, raw: &str, normalized: NormalizedKeys) -> Self {
        Self {
            raw_keys: spec.keys.clone(),
            raw: raw.to_string(),
            canonical: normalized.canonical,
            tokens: normalized.tokens,
            handler: Rc::clone(&spec.handler),
            desc: spec.desc.clone(),
        }
    }

    pub fn snapshot(&self) -> KeyMapSnapshot {
        KeyMapSnapshot {
            desc: self.desc.clone(),
            raw_keys: self.raw_keys.clone(),
            keys: self.canonical.clone(),
            key_list: self.tokens.clone(),
        }
    }
}

impl fmt::Debug for RegisteredEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredEntry")
            .field("raw", &self.raw)
            .field("canonical", &self.canonical)
            .field("tokens", &self.tokens)
            .field("desc", &self.desc)
            .finish_non_exhaustive()
    }
}

/// Handler-free copy of an entry, as returned by [`crate::Keymap::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMapSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    pub raw_keys: Keys,
    /// Canonical string.
    pub keys: String,
    /// Resolved tokens.
    pub key_list: Vec<String>,
}
