//! Browser DOM event targets (`wasm32` only).
//!
//! Wraps a `web_sys::EventTarget` so a registry can listen to a page element or
//! the global window. The JS closures handed to `addEventListener` are owned
//! here and dropped only after the matching `removeEventListener`.

use crate::event::{EventKind, EventTarget, KeyEvent, Listener, ListenerId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

type JsListener = Closure<dyn FnMut(web_sys::Event)>;

/// A DOM node (element, document or window) usable as an [`EventTarget`].
pub struct DomTarget {
    target: web_sys::EventTarget,
    closures: RefCell<HashMap<ListenerId, JsListener>>,
    next_id: Cell<u64>,
}

impl DomTarget {
    pub fn new(target: impl Into<web_sys::EventTarget>) -> Self {
        Self {
            target: target.into(),
            closures: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    /// The global `window`, if running in a browsing context.
    pub fn window() -> Option<Self> {
        web_sys::window().map(Self::new)
    }
}

/// Convert a DOM event into a [`KeyEvent`] of the subscribed kind.
fn to_key_event(kind: EventKind, event: &web_sys::Event) -> Option<KeyEvent> {
    match kind {
        EventKind::Blur => Some(KeyEvent::blur()),
        EventKind::KeyDown | EventKind::KeyUp => {
            let keyboard = event.dyn_ref::<web_sys::KeyboardEvent>()?;
            Some(KeyEvent {
                kind,
                key: keyboard.key(),
            })
        }
    }
}

impl EventTarget for DomTarget {
    fn add_event_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let closure: JsListener = Closure::new(move |e: web_sys::Event| {
            if let Some(event) = to_key_event(kind, &e) {
                listener(&event);
            }
        });

        if let Err(e) = self
            .target
            .add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
        {
            log::warn!("addEventListener('{}') failed: {:?}", kind, e);
        }
        self.closures.borrow_mut().insert(id, closure);
        id
    }

    fn remove_event_listener(&self, kind: EventKind, id: ListenerId) {
        let Some(closure) = self.closures.borrow_mut().remove(&id) else {
            return;
        };
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
        {
            log::warn!("removeEventListener('{}') failed: {:?}", kind, e);
        }
    }
}
