//! Integration tests for keymap-keybindings.
//!
//! These tests exercise the full normalize → registry → event tracking
//! pipeline by dispatching keydown/keyup/blur events through an in-memory
//! `EventBus` and counting handler invocations.

use keymap_keybindings::{
    EventBus, EventKind, EventTarget, KeyEvent, KeyMapSpec, Keymap, KeymapError, KeymapOptions,
    KeymapStrategy, PlatformDetector,
};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

fn counter() -> (Rc<Cell<usize>>, impl Fn(Option<&KeyEvent>) + 'static) {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    (count, move |_: Option<&KeyEvent>| c.set(c.get() + 1))
}

fn options(bus: &Rc<EventBus>, strategy: KeymapStrategy, platform: &str) -> KeymapOptions {
    let window: Rc<dyn EventTarget> = bus.clone();
    KeymapOptions::default()
        .with_window(window)
        .with_strategy(strategy)
        .with_platform(PlatformDetector::new(platform))
}

// ---------------------------------------------------------------------------
// Behaviour shared by both strategies
// ---------------------------------------------------------------------------

fn common(strategy: KeymapStrategy) {
    let bus = Rc::new(EventBus::new());
    let (count, handler) = counter();
    let mut km = Keymap::with_options(
        options(&bus, strategy, "linux"),
        [KeyMapSpec::new("ctrl+r", handler)],
    );

    bus.key_down("control");
    bus.key_down("r");
    assert_eq!(count.get(), 1);

    bus.key_up("r");
    assert_eq!(count.get(), 1);

    bus.key_down("r");
    assert_eq!(count.get(), 2);

    // Blur forgets everything held, so "r" alone does not fire
    bus.blur();
    bus.key_down("r");
    assert_eq!(count.get(), 2);

    bus.key_up("control");

    km.destroy();
    assert_eq!(
        km.add(KeyMapSpec::new("a", |_| {})),
        Err(KeymapError::Destroyed)
    );
    assert_eq!(bus.listener_count(EventKind::KeyDown), 0);
    assert_eq!(bus.listener_count(EventKind::KeyUp), 0);
    assert_eq!(bus.listener_count(EventKind::Blur), 0);
}

#[test]
fn record_all_common() {
    common(KeymapStrategy::RecordAll);
}

#[test]
fn record_compose_common() {
    common(KeymapStrategy::RecordCompose);
}

// ---------------------------------------------------------------------------
// Record all pressed keys
// ---------------------------------------------------------------------------

#[test]
fn record_all_meta_or_control_on_mac() {
    let bus = Rc::new(EventBus::new());
    let (count, handler) = counter();
    let handler: keymap_keybindings::Handler = Rc::new(handler);

    let mut km = Keymap::with_options(
        options(&bus, KeymapStrategy::RecordAll, "mac"),
        [KeyMapSpec {
            keys: "ctrlOrMeta+r+c".into(),
            handler: Rc::clone(&handler),
            desc: None,
        }],
    );

    bus.key_down("control");
    bus.key_down("r");
    bus.key_down("c");
    assert_eq!(count.get(), 0);
    km.destroy();

    let _km = Keymap::with_options(
        options(&bus, KeymapStrategy::RecordAll, "mac"),
        [KeyMapSpec {
            keys: "ctrlOrMeta+r+c".into(),
            handler,
            desc: None,
        }],
    );

    bus.key_down("meta");
    bus.key_down("r");
    bus.key_down("c");
    assert_eq!(count.get(), 1);
}

#[test]
fn record_all_meta_release_forgets_stuck_keys() {
    let bus = Rc::new(EventBus::new());
    let (count, handler) = counter();
    let _km = Keymap::with_options(
        options(&bus, KeymapStrategy::RecordAll, "linux"),
        [KeyMapSpec::new("r", handler)],
    );

    bus.key_down("Meta");
    bus.key_down("x");
    // keyup for "x" never arrives while Meta is held
    bus.key_up("Meta");
    bus.key_down("r");
    assert_eq!(count.get(), 1);
}

#[test]
fn record_all_requires_exact_set() {
    let bus = Rc::new(EventBus::new());
    let (count, handler) = counter();
    let _km = Keymap::with_options(
        options(&bus, KeymapStrategy::RecordAll, "linux"),
        [KeyMapSpec::new("ctrl+r", handler)],
    );

    bus.key_down("control");
    bus.key_down("shift");
    bus.key_down("r");
    assert_eq!(count.get(), 0);
}

// ---------------------------------------------------------------------------
// Record composed modifiers only
// ---------------------------------------------------------------------------

#[test]
fn record_compose_chord_with_two_ordinary_keys() {
    let bus = Rc::new(EventBus::new());
    let (count, handler) = counter();
    let _km = Keymap::with_options(
        options(&bus, KeymapStrategy::RecordCompose, "linux"),
        [KeyMapSpec::new("ctrl+r+c", handler)],
    );

    bus.key_down("control");
    bus.key_down("r");
    assert_eq!(count.get(), 0);

    bus.key_down("c");
    assert_eq!(count.get(), 1);

    bus.key_up("control");
    bus.key_up("r");
    bus.key_up("c");

    bus.key_down("control");
    bus.key_down("c");
    assert_eq!(count.get(), 2);
}

#[test]
fn record_compose_released_modifier_does_not_fire() {
    let bus = Rc::new(EventBus::new());
    let (count, handler) = counter();
    let _km = Keymap::with_options(
        options(&bus, KeymapStrategy::RecordCompose, "linux"),
        [KeyMapSpec::new("ctrl+r", handler)],
    );

    bus.key_down("control");
    bus.key_down("r");
    bus.key_up("control");
    bus.key_down("r");
    assert_eq!(count.get(), 1);
}

#[test]
fn record_compose_is_default_strategy() {
    let bus = Rc::new(EventBus::new());
    let window: Rc<dyn EventTarget> = bus.clone();
    let km = Keymap::with_options(KeymapOptions::default().with_window(window), []);
    assert_eq!(km.strategy(), KeymapStrategy::RecordCompose);
}

#[test]
fn record_compose_space_and_case() {
    let bus = Rc::new(EventBus::new());
    let (count, handler) = counter();
    let _km = Keymap::with_options(
        options(&bus, KeymapStrategy::RecordCompose, "linux"),
        [KeyMapSpec::new("Shift+Space", handler)],
    );

    bus.key_down("Shift");
    bus.key_down(" ");
    assert_eq!(count.get(), 1);
}

// ---------------------------------------------------------------------------
// Live entry list and event sources
// ---------------------------------------------------------------------------

#[test]
fn added_and_removed_entries_take_effect_immediately() {
    let bus = Rc::new(EventBus::new());
    let (count, handler) = counter();
    let mut km = Keymap::with_options(options(&bus, KeymapStrategy::RecordCompose, "linux"), []);

    bus.key_down("control");
    bus.key_down("k");
    assert_eq!(count.get(), 0);

    assert_eq!(km.add(KeyMapSpec::new("ctrl+k", handler)), Ok(1));
    bus.key_down("k");
    assert_eq!(count.get(), 1);

    km.remove("ctrl+k");
    bus.key_down("k");
    assert_eq!(count.get(), 1);
}

#[test]
fn handler_receives_native_event() {
    let bus = Rc::new(EventBus::new());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let _km = Keymap::with_options(
        options(&bus, KeymapStrategy::RecordCompose, "linux"),
        [KeyMapSpec::new("alt+x", move |e: Option<&KeyEvent>| {
            s.borrow_mut().push(e.map(|e| e.key.clone()));
        })],
    );

    bus.key_down("Alt");
    bus.key_down("X");
    assert_eq!(*seen.borrow(), vec![Some("X".to_string())]);
}

#[test]
fn element_and_window_are_separate_sources() {
    let el = Rc::new(EventBus::new());
    let window = Rc::new(EventBus::new());
    let (count, handler) = counter();
    let el_target: Rc<dyn EventTarget> = el.clone();
    let window_target: Rc<dyn EventTarget> = window.clone();
    let _km = Keymap::with_options(
        KeymapOptions::default()
            .with_el(el_target)
            .with_window(window_target)
            .with_strategy(KeymapStrategy::RecordAll)
            .with_platform(PlatformDetector::new("linux")),
        [KeyMapSpec::new("ctrl+r", handler)],
    );

    // Keys on the window are not observed
    window.key_down("control");
    window.key_down("r");
    assert_eq!(count.get(), 0);

    el.key_down("control");
    // Blur on the element is not the window's blur
    el.blur();
    el.key_down("r");
    assert_eq!(count.get(), 1);

    el.key_up("r");
    window.blur();
    el.key_down("r");
    assert_eq!(count.get(), 1);
}

#[test]
fn independent_registries_both_fire() {
    let bus = Rc::new(EventBus::new());
    let (first, h1) = counter();
    let (second, h2) = counter();
    let _a = Keymap::with_options(
        options(&bus, KeymapStrategy::RecordCompose, "linux"),
        [KeyMapSpec::new("ctrl+s", h1)],
    );
    let _b = Keymap::with_options(
        options(&bus, KeymapStrategy::RecordAll, "linux"),
        [KeyMapSpec::new("control+s", h2)],
    );

    bus.key_down("control");
    bus.key_down("s");
    assert_eq!((first.get(), second.get()), (1, 1));
}

#[test]
fn dropping_registry_detaches_listeners() {
    let bus = Rc::new(EventBus::new());
    {
        let _km = Keymap::with_options(
            options(&bus, KeymapStrategy::RecordAll, "linux"),
            [KeyMapSpec::new("ctrl+r", |_| {})],
        );
        assert_eq!(bus.listener_count(EventKind::KeyDown), 1);
        assert_eq!(bus.listener_count(EventKind::Blur), 1);
    }
    assert_eq!(bus.listener_count(EventKind::KeyDown), 0);
    assert_eq!(bus.listener_count(EventKind::KeyUp), 0);
    assert_eq!(bus.listener_count(EventKind::Blur), 0);
}

#[test]
fn handler_may_mutate_registry() {
    let bus = Rc::new(EventBus::new());
    let km = Rc::new(RefCell::new(Keymap::with_options(
        options(&bus, KeymapStrategy::RecordCompose, "linux"),
        [],
    )));
    let (count, handler) = counter();

    // One-shot binding: removes itself when it fires
    let weak: Weak<RefCell<Keymap>> = Rc::downgrade(&km);
    let added = km.borrow_mut().add(KeyMapSpec::new("ctrl+o", move |e| {
        handler(e);
        if let Some(km) = weak.upgrade() {
            km.borrow_mut().remove("ctrl+o");
        }
    }));
    assert_eq!(added, Ok(1));

    bus.key_down("control");
    bus.key_down("o");
    bus.key_down("o");
    assert_eq!(count.get(), 1);
    assert!(km.borrow().is_empty());
}

#[test]
fn handler_may_destroy_registry() {
    let bus = Rc::new(EventBus::new());
    let km = Rc::new(RefCell::new(Keymap::with_options(
        options(&bus, KeymapStrategy::RecordAll, "linux"),
        [],
    )));
    let weak = Rc::downgrade(&km);
    km.borrow_mut()
        .add(KeyMapSpec::new("escape", move |_| {
            if let Some(km) = weak.upgrade() {
                km.borrow_mut().destroy();
            }
        }))
        .unwrap();

    bus.key_down("Escape");
    assert!(km.borrow().is_destroyed());
    assert_eq!(bus.listener_count(EventKind::KeyDown), 0);
}

#[test]
fn default_window_is_thread_global() {
    let (count, handler) = counter();
    let _km = Keymap::with_options(
        KeymapOptions::default().with_platform(PlatformDetector::new("linux")),
        [KeyMapSpec::new("ctrl+g", handler)],
    );

    let window = EventBus::window();
    window.key_down("control");
    window.key_down("g");
    window.key_up("g");
    window.key_up("control");
    assert_eq!(count.get(), 1);
}
