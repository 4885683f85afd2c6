//! Platform-specific keybinding resolution.
//!
//! Contains:
//! - macOS detection from an overridable platform identifier
//! - `MetaOrControl` modifier expansion (Meta on macOS, Control elsewhere)
//! - The key alias table (alias spelling or glyph → canonical key name)

use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

/// Platform identifiers that mark a macOS-family host.
static MAC_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)mac|ipod|iphone|ipad|darwin|\bios\b")
        .expect("macOS signature regex is a compile-time constant and must be valid")
});

pub const META: &str = "meta";
pub const CONTROL: &str = "control";

/// Shorthand that always means the platform's primary modifier.
const MOD_SHORTHAND: &str = "mod";

/// Decides whether the host is a macOS-family system.
///
/// The identifier it inspects is plain data, so tests (and hosts that know
/// better) can force either branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDetector {
    source: String,
}

impl PlatformDetector {
    /// Detector over an explicit identifier, e.g. a user agent string.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Detector over the environment's own identifier.
    ///
    /// In a browser this is `navigator.userAgent`; natively it is the target OS name.
    pub fn from_env() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let user_agent = web_sys::window()
                .and_then(|w| w.navigator().user_agent().ok())
                .unwrap_or_default();
            Self::new(user_agent)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::new(std::env::consts::OS)
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    #[inline]
    pub fn is_mac(&self) -> bool {
        MAC_SIGNATURE.is_match(&self.source)
    }

    /// What `MetaOrControl` resolves to on this platform.
    #[inline]
    pub fn meta_or_control(&self) -> &'static str {
        if self.is_mac() { META } else { CONTROL }
    }
}

impl Default for PlatformDetector {
    fn default() -> Self {
        Self::from_env()
    }
}

/// A named group of spellings that all mean one canonical key.
#[derive(Debug, Clone, Copy)]
pub struct AliasGroup {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
}

/// Built-in alias groups. Aliases are lowercase since inputs are lowercased first.
pub const DEFAULT_ALIAS_GROUPS: &[AliasGroup] = &[
    AliasGroup {
        canonical: META,
        aliases: &["command", "cmd", "⌘", "super", "win"],
    },
    AliasGroup {
        canonical: CONTROL,
        aliases: &["ctrl", "⌃"],
    },
    AliasGroup {
        canonical: "shift",
        aliases: &["⇧"],
    },
    AliasGroup {
        canonical: "alt",
        aliases: &["option", "opt", "⌥"],
    },
    AliasGroup {
        canonical: "escape",
        aliases: &["esc"],
    },
    AliasGroup {
        canonical: "enter",
        aliases: &["return", "⏎", "↩︎", "↩"],
    },
    AliasGroup {
        canonical: "+",
        aliases: &["plus"],
    },
    AliasGroup {
        canonical: " ",
        aliases: &["space", "spacebar", "␣"],
    },
    AliasGroup {
        canonical: "backspace",
        aliases: &["⌫"],
    },
    AliasGroup {
        canonical: "tab",
        aliases: &["⇥"],
    },
    AliasGroup {
        canonical: "arrowleft",
        aliases: &["left", "←"],
    },
    AliasGroup {
        canonical: "arrowright",
        aliases: &["right", "→"],
    },
    AliasGroup {
        canonical: "arrowup",
        aliases: &["up", "↑"],
    },
    AliasGroup {
        canonical: "arrowdown",
        aliases: &["down", "↓"],
    },
];

/// Mapping from alias token to canonical token.
///
/// `AliasMap::default()` is the built-in table; [`AliasMap::empty`] has no entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasMap {
    map: HashMap<String, String>,
}

impl AliasMap {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Flatten alias groups into a single table.
    pub fn from_groups(groups: &[AliasGroup]) -> Self {
        let mut table = Self::empty();
        for group in groups {
            for alias in group.aliases {
                table.insert(alias, group.canonical);
            }
        }
        table
    }

    /// Add or replace one alias. The alias is lowercased.
    pub fn insert(&mut self, alias: &str, canonical: &str) {
        self.map.insert(alias.to_lowercase(), canonical.to_string());
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.map.get(alias).map(String::as_str)
    }

    /// Does `token` name `canonical`, either directly or through an alias?
    pub fn means(&self, token: &str, canonical: &str) -> bool {
        token == canonical || self.get(token) == Some(canonical)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Sorted copy, convenient for display and config files.
    pub fn to_btree(&self) -> BTreeMap<String, String> {
        self.map
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl Default for AliasMap {
    fn default() -> Self {
        Self::from_groups(DEFAULT_ALIAS_GROUPS)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for AliasMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::empty();
        for (alias, canonical) in iter {
            table.insert(alias.as_ref(), canonical.as_ref());
        }
        table
    }
}

impl From<BTreeMap<String, String>> for AliasMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

/// Is `token` one of the synthetic "meta or control" names?
///
/// These are every spelling of `meta` joined to every spelling of `control` by
/// `or`, in either order (`cmdorctrl`, `controlormeta`, ...), plus `mod`.
pub fn is_meta_or_control(token: &str, aliases: &AliasMap) -> bool {
    if token == MOD_SHORTHAND {
        return true;
    }
    token.match_indices("or").any(|(i, _)| {
        let (left, right) = (&token[..i], &token[i + 2..]);
        (aliases.means(left, META) && aliases.means(right, CONTROL))
            || (aliases.means(left, CONTROL) && aliases.means(right, META))
    })
}
