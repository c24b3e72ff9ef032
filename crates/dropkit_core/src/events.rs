//! Input events delivered by the host event loop

/// Keys the widgets understand
///
/// Hosts translate their platform key codes into this enum before dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Tab,
    Home,
    End,
    /// A printable character
    Char(char),
    /// Any other platform key, by raw code
    Other(u32),
}

/// A key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed
    pub key: KeyCode,
    /// Whether shift was held
    pub shift: bool,
}

impl KeyEvent {
    /// Create a key event without modifiers
    pub fn new(key: KeyCode) -> Self {
        Self { key, shift: false }
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(key: KeyCode) -> Self {
        Self::new(key)
    }
}

/// Source device of a pointer event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// A pointer press at an absolute position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// X position in logical pixels
    pub x: f32,
    /// Y position in logical pixels
    pub y: f32,
    /// Device that produced the event
    pub kind: PointerKind,
}

impl PointerEvent {
    /// Mouse press at a position
    pub fn mouse(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            kind: PointerKind::Mouse,
        }
    }

    /// Touch start at a position
    pub fn touch(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            kind: PointerKind::Touch,
        }
    }
}

/// Event categories a global listener can subscribe to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    TouchStart,
    KeyDown,
}

/// Envelope for events dispatched through the global listener registry
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// Mouse or pen button pressed
    PointerDown(PointerEvent),
    /// Finger touched the surface
    TouchStart(PointerEvent),
    /// Key pressed
    KeyDown(KeyEvent),
}

impl HostEvent {
    /// The listener category this event is routed to
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::PointerDown(_) => EventKind::PointerDown,
            HostEvent::TouchStart(_) => EventKind::TouchStart,
            HostEvent::KeyDown(_) => EventKind::KeyDown,
        }
    }

    /// Pointer payload, if this is a pointer or touch event
    pub fn pointer(&self) -> Option<&PointerEvent> {
        match self {
            HostEvent::PointerDown(p) | HostEvent::TouchStart(p) => Some(p),
            HostEvent::KeyDown(_) => None,
        }
    }

    /// Key payload, if this is a key event
    pub fn key(&self) -> Option<&KeyEvent> {
        match self {
            HostEvent::KeyDown(k) => Some(k),
            _ => None,
        }
    }
}

/// What a listener asks the host to do with the event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// Suppress the platform default (page scroll on arrows, form submit on enter)
    pub prevent_default: bool,
}

impl EventResponse {
    /// Response of a passive listener; never blocks default behavior
    pub fn passive() -> Self {
        Self {
            prevent_default: false,
        }
    }

    /// Response that suppresses the platform default
    pub fn prevent_default() -> Self {
        Self {
            prevent_default: true,
        }
    }

    /// Combine two responses; default is prevented if either asks for it
    pub fn merge(self, other: EventResponse) -> Self {
        Self {
            prevent_default: self.prevent_default || other.prevent_default,
        }
    }
}
