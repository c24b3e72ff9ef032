//! Keyboard navigation
//!
//! While the dropdown is open, a single global key listener interprets four
//! keys against the filtered list:
//!
//! - `ArrowDown` moves focus to the next item (clamped at the end)
//! - `ArrowUp` moves focus to the previous item (clamped at the start)
//! - `Enter` selects the focused item
//! - `Escape` closes the dropdown
//!
//! Each of them suppresses the platform default. Every other key passes
//! through untouched. With sections, the arrows follow the rows as the list
//! shows them (ungrouped first, then each section) rather than raw indices.

use dropkit_core::{EventKind, EventResponse, KeyCode, ListenerHandle, ListenerRegistry};

/// What the owner of the navigator should do after a key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavCommand {
    /// Nothing beyond the focus change
    None,
    /// Select the item at this index of the filtered list
    Select(usize),
    /// Close the dropdown
    Close,
}

/// Result of feeding a key to the navigator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyResponse {
    /// The key was one of the navigation keys
    pub handled: bool,
    pub command: NavCommand,
}

impl KeyResponse {
    fn ignored() -> Self {
        Self {
            handled: false,
            command: NavCommand::None,
        }
    }

    fn handled(command: NavCommand) -> Self {
        Self {
            handled: true,
            command,
        }
    }

    /// Event response to hand back to the host
    pub fn event_response(&self) -> EventResponse {
        if self.handled {
            EventResponse::prevent_default()
        } else {
            EventResponse::passive()
        }
    }
}

/// Focus cursor over the filtered list
///
/// `None` means no item is focused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyboardNav {
    focused: Option<usize>,
}

impl KeyboardNav {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the key is one the navigator consumes
    pub fn is_nav_key(key: KeyCode) -> bool {
        matches!(
            key,
            KeyCode::ArrowDown | KeyCode::ArrowUp | KeyCode::Enter | KeyCode::Escape
        )
    }

    /// Currently focused index
    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    /// Forget the focused index
    pub fn reset(&mut self) {
        self.focused = None;
    }

    /// Focus an index directly (pointer hover)
    ///
    /// Out-of-range indices clear the focus.
    pub fn set_focused(&mut self, index: Option<usize>, len: usize) {
        self.focused = index.filter(|&i| i < len);
    }

    /// Pull the focus back into range after the list shrank
    pub fn clamp(&mut self, len: usize) {
        self.focused = match self.focused {
            Some(_) if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => None,
        };
    }

    /// Interpret a key against a list of `len` items
    pub fn handle_key(&mut self, key: KeyCode, len: usize) -> KeyResponse {
        match key {
            KeyCode::ArrowDown => {
                if len > 0 {
                    self.focused = Some(match self.focused {
                        None => 0,
                        Some(i) => (i + 1).min(len - 1),
                    });
                }
                KeyResponse::handled(NavCommand::None)
            }
            KeyCode::ArrowUp => {
                if len > 0 {
                    self.focused = Some(match self.focused {
                        None => 0,
                        Some(i) => i.min(len - 1).saturating_sub(1),
                    });
                }
                KeyResponse::handled(NavCommand::None)
            }
            KeyCode::Enter => match self.focused {
                Some(i) if i < len => KeyResponse::handled(NavCommand::Select(i)),
                _ => KeyResponse::handled(NavCommand::None),
            },
            KeyCode::Escape => KeyResponse::handled(NavCommand::Close),
            _ => KeyResponse::ignored(),
        }
    }

    /// Interpret a key, stepping through `order` instead of index order
    ///
    /// `order` lists filtered-list indices in the order the rows are shown,
    /// so arrows follow section grouping. The focused value stays a
    /// filtered-list index. A focus missing from `order` counts as none.
    pub fn handle_key_in(&mut self, key: KeyCode, order: &[usize]) -> KeyResponse {
        let position = self
            .focused
            .and_then(|focused| order.iter().position(|&i| i == focused));
        let last = order.len().saturating_sub(1);
        match key {
            KeyCode::ArrowDown | KeyCode::ArrowUp => {
                let next = match (key, position) {
                    (_, None) => 0,
                    (KeyCode::ArrowDown, Some(p)) => (p + 1).min(last),
                    (_, Some(p)) => p.saturating_sub(1),
                };
                if let Some(&index) = order.get(next) {
                    self.focused = Some(index);
                }
                KeyResponse::handled(NavCommand::None)
            }
            KeyCode::Enter => match (self.focused, position) {
                (Some(index), Some(_)) => KeyResponse::handled(NavCommand::Select(index)),
                _ => KeyResponse::handled(NavCommand::None),
            },
            _ => self.handle_key(key, order.len()),
        }
    }
}

/// Global key listener that lives while the dropdown is open
pub(crate) struct KeyCapture {
    registry: ListenerRegistry,
    handle: Option<ListenerHandle>,
}

impl KeyCapture {
    pub(crate) fn new(registry: ListenerRegistry) -> Self {
        Self {
            registry,
            handle: None,
        }
    }

    /// Start forwarding navigation keys to `on_key`
    ///
    /// Attaching twice keeps the first listener.
    pub(crate) fn attach<F>(&mut self, on_key: F)
    where
        F: Fn(KeyCode) + Send + Sync + 'static,
    {
        if self.handle.is_some() {
            return;
        }
        let handle = self.registry.subscribe(EventKind::KeyDown, move |event| {
            match event.key() {
                Some(key) if KeyboardNav::is_nav_key(key.key) => {
                    on_key(key.key);
                    EventResponse::prevent_default()
                }
                _ => EventResponse::passive(),
            }
        });
        tracing::trace!("KeyCapture: attached {:?}", handle);
        self.handle = Some(handle);
    }

    pub(crate) fn detach(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.registry.unsubscribe(handle);
            tracing::trace!("KeyCapture: detached {:?}", handle);
        }
    }

    #[cfg(test)]
    pub(crate) fn is_attached(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for KeyCapture {
    fn drop(&mut self) {
        self.detach();
    }
}
