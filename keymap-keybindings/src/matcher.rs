//! Key event tracking strategies.
//!
//! A tracker turns a stream of keydown/keyup/blur events into "which entry
//! fires now". Two policies exist:
//!
//! - [`RecordAll`] remembers every key that is down and fires the entry whose
//!   token set equals the held set.
//! - [`RecordCompose`] remembers only held modifiers and fires the entry whose
//!   non-modifier key is the key just pressed and whose modifiers are exactly
//!   the held ones.
//!
//! With Meta held, macOS drops keyup for the other keys, so `RecordAll` can
//! leave ordinary keys stuck down; `RecordCompose` is the default for that reason.
//!
//! [`Subscription`] wires a tracker to event targets and reads the registry's
//! entries live on every event.

use crate::binding::{Handler, RegisteredEntry};
use crate::event::{EventKind, EventTarget, KeyEvent, ListenerId};
use crate::parser::is_modifier;
use crate::platform::META;
use keymap_config::KeymapStrategy;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Entry list shared between a registry and its subscription.
pub type SharedEntries = Rc<RefCell<Vec<RegisteredEntry>>>;

/// Per-subscription pressed-key state.
///
/// Keys passed in are already lowercased.
pub trait KeyTracker {
    /// Record a keydown and return the index of the entry that fires, if any.
    fn key_down(&mut self, key: &str, entries: &[RegisteredEntry]) -> Option<usize>;

    fn key_up(&mut self, key: &str);

    /// Focus left the page; keyups may have been lost.
    fn blur(&mut self);
}

/// Build the tracker for `strategy`.
pub fn tracker_for(strategy: KeymapStrategy) -> Box<dyn KeyTracker> {
    match strategy {
        KeymapStrategy::RecordAll => Box::new(RecordAll::default()),
        KeymapStrategy::RecordCompose => Box::new(RecordCompose::default()),
    }
}

/// Tracks every key currently down.
#[derive(Debug, Default)]
pub struct RecordAll {
    pressed: BTreeSet<String>,
}

impl RecordAll {
    pub fn pressed(&self) -> &BTreeSet<String> {
        &self.pressed
    }
}

impl KeyTracker for RecordAll {
    fn key_down(&mut self, key: &str, entries: &[RegisteredEntry]) -> Option<usize> {
        self.pressed.insert(key.to_string());
        log::trace!("keymap: pressed {:?}", self.pressed);

        entries.iter().position(|entry| {
            entry.tokens.len() == self.pressed.len()
                && entry.tokens.iter().all(|k| self.pressed.contains(k))
        })
    }

    fn key_up(&mut self, key: &str) {
        log::trace!("keymap: keyup {:?}", key);
        self.pressed.remove(key);
        // Other keys released while Meta was held never report keyup
        if key == META {
            self.pressed.clear();
        }
    }

    fn blur(&mut self) {
        self.pressed.clear();
    }
}

/// Tracks only held modifiers.
#[derive(Debug, Default)]
pub struct RecordCompose {
    modifiers: BTreeSet<String>,
}

impl RecordCompose {
    pub fn held_modifiers(&self) -> &BTreeSet<String> {
        &self.modifiers
    }
}

/// Split tokens into the (last) non-modifier key and the modifiers.
fn classify(tokens: &[String]) -> (&str, Vec<&str>) {
    let mut key = "";
    let mut modifiers = Vec::new();
    for token in tokens {
        if is_modifier(token) {
            modifiers.push(token.as_str());
        } else {
            key = token;
        }
    }
    (key, modifiers)
}

impl KeyTracker for RecordCompose {
    fn key_down(&mut self, key: &str, entries: &[RegisteredEntry]) -> Option<usize> {
        if is_modifier(key) {
            self.modifiers.insert(key.to_string());
            return None;
        }
        log::trace!("keymap: modifiers {:?} key {:?}", self.modifiers, key);

        entries.iter().position(|entry| {
            let (entry_key, entry_modifiers) = classify(&entry.tokens);
            entry_key == key
                && entry_modifiers.len() == self.modifiers.len()
                && entry_modifiers.iter().all(|m| self.modifiers.contains(*m))
        })
    }

    fn key_up(&mut self, key: &str) {
        log::trace!("keymap: keyup {:?}", key);
        if is_modifier(key) {
            self.modifiers.remove(key);
        }
    }

    fn blur(&mut self) {
        self.modifiers.clear();
    }
}

/// Listeners attached on behalf of one registry.
///
/// Cancelling detaches exactly the listeners that were attached; it is safe to
/// call more than once and happens automatically on drop.
pub struct Subscription {
    el: Rc<dyn EventTarget>,
    window: Rc<dyn EventTarget>,
    listeners: Vec<(EventKind, ListenerId)>,
}

impl Subscription {
    /// Attach `tracker` to keydown/keyup on `el` and blur on `window`.
    pub fn activate(
        el: Rc<dyn EventTarget>,
        window: Rc<dyn EventTarget>,
        tracker: Box<dyn KeyTracker>,
        entries: SharedEntries,
    ) -> Self {
        let tracker: Rc<RefCell<Box<dyn KeyTracker>>> = Rc::new(RefCell::new(tracker));

        let keydown = {
            let tracker = Rc::clone(&tracker);
            el.add_event_listener(
                EventKind::KeyDown,
                Rc::new(move |event: &KeyEvent| {
                    let key = event.key.to_lowercase();
                    let handler: Option<Handler> = {
                        let entries = entries.borrow();
                        let found = tracker.borrow_mut().key_down(&key, &entries);
                        found.map(|index| {
                            log::debug!("keymap: '{}' fired", entries[index].canonical);
                            Rc::clone(&entries[index].handler)
                        })
                    };
                    // No borrows held: the handler may call back into the registry
                    if let Some(handler) = handler {
                        handler(Some(event));
                    }
                }),
            )
        };

        let keyup = {
            let tracker = Rc::clone(&tracker);
            el.add_event_listener(
                EventKind::KeyUp,
                Rc::new(move |event: &KeyEvent| {
                    tracker.borrow_mut().key_up(&event.key.to_lowercase());
                }),
            )
        };

        let blur = window.add_event_listener(
            EventKind::Blur,
            Rc::new(move |_: &KeyEvent| tracker.borrow_mut().blur()),
        );

        Self {
            el,
            window,
            listeners: vec![
                (EventKind::KeyDown, keydown),
                (EventKind::KeyUp, keyup),
                (EventKind::Blur, blur),
            ],
        }
    }

    pub fn is_active(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn cancel(&mut self) {
        for (kind, id) in self.listeners.drain(..) {
            match kind {
                EventKind::Blur => self.window.remove_event_listener(kind, id),
                EventKind::KeyDown | EventKind::KeyUp => self.el.remove_event_listener(kind, id),
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
