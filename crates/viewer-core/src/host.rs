//! Host environment capabilities
//!
//! Viewers reach the outside world through two narrow traits: an event
//! target for document-wide listeners (keyboard, fullscreen changes) and the
//! fullscreen API. The host delivers events as [`HostEvent`]s addressed to a
//! listener; a viewer only reacts to events for listeners it registered.
//!
//! [`HeadlessHost`] implements both traits in memory and queues events for
//! the embedding loop to dispatch.

use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Keyboard,
    FullscreenChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    ZoomIn,
    ZoomOut,
}

impl KeyEvent {
    pub fn plain(key: Key) -> Self {
        Self { key, modifiers: Modifiers::default() }
    }

    pub fn ctrl(c: char) -> Self {
        Self { key: Key::Char(c), modifiers: Modifiers { ctrl: true, ..Modifiers::default() } }
    }

    pub fn meta(c: char) -> Self {
        Self { key: Key::Char(c), modifiers: Modifiers { meta: true, ..Modifiers::default() } }
    }

    /// Zoom shortcut bound to this key press, if any.
    ///
    /// Ctrl or Cmd with `+` (or `=`, the unshifted plus key) zooms in and with
    /// `-` zooms out.
    pub fn shortcut(&self) -> Option<ShortcutAction> {
        if !(self.modifiers.ctrl || self.modifiers.meta) {
            return None;
        }

        match self.key {
            Key::Char('+') | Key::Char('=') => Some(ShortcutAction::ZoomIn),
            Key::Char('-') => Some(ShortcutAction::ZoomOut),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEventKind {
    Key(KeyEvent),
    FullscreenChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostEvent {
    pub listener: ListenerId,
    pub kind: HostEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event was consumed; the host should suppress its default action.
    Handled,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("fullscreen is not supported by this host")]
    FullscreenUnsupported,
    #[error("fullscreen request denied: {0}")]
    FullscreenDenied(String),
}

pub trait EventTarget {
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;

    /// Returns `false` when the listener was not registered.
    fn remove_listener(&mut self, id: ListenerId) -> bool;
}

pub trait Fullscreen {
    fn enter(&mut self) -> Result<(), HostError>;
    fn exit(&mut self) -> Result<(), HostError>;
    fn is_active(&self) -> bool;
}

pub trait Host: EventTarget + Fullscreen {}

impl<T: EventTarget + Fullscreen> Host for T {}

/// In-memory host used by the CLI and tests
#[derive(Debug)]
pub struct HeadlessHost {
    next_listener: u64,
    listeners: BTreeMap<ListenerId, ListenerKind>,
    fullscreen_supported: bool,
    fullscreen: bool,
    queue: VecDeque<HostEvent>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            next_listener: 0,
            listeners: BTreeMap::new(),
            fullscreen_supported: true,
            fullscreen: false,
            queue: VecDeque::new(),
        }
    }

    pub fn without_fullscreen() -> Self {
        Self { fullscreen_supported: false, ..Self::new() }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn listener_kind(&self, id: ListenerId) -> Option<ListenerKind> {
        self.listeners.get(&id).copied()
    }

    /// Deliver a document-wide key press to every keyboard listener.
    ///
    /// Escape also leaves fullscreen, as browsers do.
    pub fn press_key(&mut self, event: KeyEvent) {
        self.notify(ListenerKind::Keyboard, HostEventKind::Key(event));

        if event.key == Key::Escape && self.fullscreen {
            self.set_fullscreen(false);
        }
    }

    pub fn poll_event(&mut self) -> Option<HostEvent> {
        self.queue.pop_front()
    }

    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        self.queue.drain(..).collect()
    }

    fn set_fullscreen(&mut self, active: bool) {
        if self.fullscreen == active {
            return;
        }

        self.fullscreen = active;
        self.notify(ListenerKind::FullscreenChange, HostEventKind::FullscreenChange);
    }

    fn notify(&mut self, kind: ListenerKind, event: HostEventKind) {
        let targets = self.listeners.iter().filter(|(_, k)| **k == kind).map(|(id, _)| *id);
        self.queue.extend(targets.map(|listener| HostEvent { listener, kind: event }));
    }
}

impl EventTarget for HeadlessHost {
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id, kind);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(&id).is_some();
        if removed {
            self.queue.retain(|event| event.listener != id);
        }
        removed
    }
}

impl Fullscreen for HeadlessHost {
    fn enter(&mut self) -> Result<(), HostError> {
        if !self.fullscreen_supported {
            return Err(HostError::FullscreenUnsupported);
        }

        self.set_fullscreen(true);
        Ok(())
    }

    fn exit(&mut self) -> Result<(), HostError> {
        self.set_fullscreen(false);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.fullscreen
    }
}
