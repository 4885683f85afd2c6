//! Key event sources.
//!
//! A registry never talks to a concrete window system. It subscribes to an
//! [`EventTarget`] for `keydown`/`keyup` and to a second target (the global
//! window) for `blur`. [`EventBus`] is an in-memory target used natively and in
//! tests; on `wasm32`, [`crate::dom::DomTarget`] wraps a real DOM node.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Kind of native event a listener subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    Blur,
}

impl EventKind {
    /// DOM event type name.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::KeyDown => "keydown",
            EventKind::KeyUp => "keyup",
            EventKind::Blur => "blur",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A native event as seen by the tracking strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: EventKind,
    /// The event's `key` value (e.g. `"Control"`, `"r"`, `" "`). Empty for blur.
    pub key: String,
}

impl KeyEvent {
    pub fn key_down(key: impl Into<String>) -> Self {
        Self {
            kind: EventKind::KeyDown,
            key: key.into(),
        }
    }

    pub fn key_up(key: impl Into<String>) -> Self {
        Self {
            kind: EventKind::KeyUp,
            key: key.into(),
        }
    }

    pub fn blur() -> Self {
        Self {
            kind: EventKind::Blur,
            key: String::new(),
        }
    }
}

/// Callback attached to an [`EventTarget`].
pub type Listener = Rc<dyn Fn(&KeyEvent)>;

/// Handle returned by [`EventTarget::add_event_listener`], used to detach the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Anything key listeners can be attached to.
pub trait EventTarget {
    /// Attach `listener` for events of `kind`.
    fn add_event_listener(&self, kind: EventKind, listener: Listener) -> ListenerId;

    /// Detach a listener previously attached for `kind`. Unknown ids are ignored.
    fn remove_event_listener(&self, kind: EventKind, id: ListenerId);
}

/// Single-threaded in-memory event target.
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<(ListenerId, EventKind, Listener)>>,
    next_id: Cell<u64>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

thread_local! {
    static WINDOW: Rc<EventBus> = Rc::new(EventBus::new());
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// The per-thread global scope, standing in for the browser's `window`.
    pub fn window() -> Rc<EventBus> {
        WINDOW.with(Rc::clone)
    }

    /// Deliver `event` to every listener registered for its kind, in attach order.
    ///
    /// Listeners are snapshotted first, so a listener may attach or detach
    /// listeners while the event is being delivered.
    pub fn dispatch(&self, event: &KeyEvent) {
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind)
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }

    pub fn key_down(&self, key: &str) {
        self.dispatch(&KeyEvent::key_down(key));
    }

    pub fn key_up(&self, key: &str) {
        self.dispatch(&KeyEvent::key_up(key));
    }

    pub fn blur(&self) {
        self.dispatch(&KeyEvent::blur());
    }

    /// Number of attached listeners of `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .count()
    }
}

impl EventTarget for EventBus {
    fn add_event_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, kind, listener));
        id
    }

    fn remove_event_listener(&self, kind: EventKind, id: ListenerId) {
        self.listeners
            .borrow_mut()
            .retain(|(listener_id, k, _)| !(*listener_id == id && *k == kind));
    }
}

/// Global scope used when no element or window is supplied.
#[cfg(not(target_arch = "wasm32"))]
pub fn default_window() -> Rc<dyn EventTarget> {
    EventBus::window()
}

/// Global scope used when no element or window is supplied.
///
/// Falls back to the in-memory bus when there is no DOM window (e.g. in a worker).
#[cfg(target_arch = "wasm32")]
pub fn default_window() -> Rc<dyn EventTarget> {
    match crate::dom::DomTarget::window() {
        Some(target) => Rc::new(target),
        None => {
            log::warn!("No DOM window available, using in-memory event bus");
            EventBus::window()
        }
    }
}
