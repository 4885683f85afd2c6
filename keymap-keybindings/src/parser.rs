//! Key combination normalizer.
//!
//! Turns human-readable strings like `"CommandOrControl+Shift+s"` into a
//! canonical string plus an order-independent list of canonical key tokens.
//! A literal `+` key survives (`"ctrl++"` is Control and Plus), and a bare
//! space is a key of its own.

use crate::platform::{AliasMap, PlatformDetector, is_meta_or_control};

/// The modifier keys. Every other token is an ordinary key.
pub const MODIFIER_KEYS: [&str; 4] = ["shift", "control", "alt", "meta"];

/// Stands in for delimiter `+` characters while splitting.
const DELIMITER: char = '\u{1f}';

/// Result of normalizing a combination string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedKeys {
    /// Lowercased, trimmed input.
    pub canonical: String,
    /// Resolved key tokens in input order. Compare with [`same_keys`].
    pub tokens: Vec<String>,
}

pub fn is_modifier(key: &str) -> bool {
    MODIFIER_KEYS.contains(&key)
}

/// Lowercase and trim, keeping a lone space intact.
pub fn canonicalize(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let trimmed = lower.trim();
    if trimmed.is_empty() {
        lower
    } else {
        trimmed.to_string()
    }
}

/// Normalize `raw` against `aliases`, resolving `MetaOrControl` with `platform`.
pub fn normalize(raw: &str, aliases: &AliasMap, platform: &PlatformDetector) -> NormalizedKeys {
    let canonical = canonicalize(raw);
    // Split before trimming so a trailing space key survives
    let tokens = split_tokens(&raw.to_lowercase())
        .into_iter()
        .map(|token| resolve_token(token, aliases, platform))
        .collect();

    NormalizedKeys { canonical, tokens }
}

/// Set equality of two token lists.
pub fn same_keys(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().all(|k| b.contains(k)) && b.iter().all(|k| a.contains(k))
}

/// Replace every delimiter `+` with [`DELIMITER`].
///
/// A `+` right after a delimiter is the plus key itself (`"ctrl++"`), as is a
/// leading `+` that stands alone or is doubled (`"+"`, `"++a"`).
fn mark_delimiters(keys: &str) -> String {
    let mut marked = String::with_capacity(keys.len());
    let mut chars = keys.chars().peekable();
    let mut at_start = true;

    while let Some(ch) = chars.next() {
        let leading_plus = at_start && matches!(chars.peek(), None | Some('+'));
        at_start = false;
        if ch != '+' || leading_plus {
            marked.push(ch);
            continue;
        }
        marked.push(DELIMITER);
        if chars.next_if_eq(&'+').is_some() {
            marked.push('+');
        }
    }
    marked
}

fn split_tokens(keys: &str) -> Vec<String> {
    mark_delimiters(keys)
        .split(DELIMITER)
        .filter_map(|segment| {
            let trimmed = segment.trim();
            if !trimmed.is_empty() {
                Some(trimmed.to_string())
            } else if !segment.is_empty() {
                // Blank but not empty: the space key
                Some(" ".to_string())
            } else {
                None
            }
        })
        .collect()
}

fn resolve_token(token: String, aliases: &AliasMap, platform: &PlatformDetector) -> String {
    if is_meta_or_control(&token, aliases) {
        return platform.meta_or_control().to_string();
    }
    match aliases.get(&token) {
        Some(canonical) => canonical.to_string(),
        None => token,
    }
}
