//! Global listener registry
//!
//! Stands in for the document-level event target of the host. Widgets attach
//! listeners only while they need them (an open dropdown listens for outside
//! presses and navigation keys) and detach them as soon as they don't.
//!
//! Listeners for one event kind run in registration order. The listener list
//! is snapshotted before dispatch, so a listener may subscribe or unsubscribe
//! (itself included) while an event is being delivered.
//!
//! # Example
//!
//! ```rust
//! use dropkit_core::{EventKind, EventResponse, HostEvent, KeyCode, KeyEvent, ListenerRegistry};
//!
//! let registry = ListenerRegistry::new();
//! let handle = registry.subscribe(EventKind::KeyDown, |event| match event.key() {
//!     Some(k) if k.key == KeyCode::Escape => EventResponse::prevent_default(),
//!     _ => EventResponse::passive(),
//! });
//!
//! let response = registry.dispatch(&HostEvent::KeyDown(KeyEvent::new(KeyCode::Escape)));
//! assert!(response.prevent_default);
//!
//! assert!(registry.unsubscribe(handle));
//! assert!(!registry.unsubscribe(handle)); // idempotent
//! ```

use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::{CoreError, Result};
use crate::events::{EventKind, EventResponse, HostEvent};
use crate::recover;

/// A global event listener
pub type Listener = Arc<dyn Fn(&HostEvent) -> EventResponse + Send + Sync>;

/// Handle for removing a registered listener
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    id: u64,
    kind: EventKind,
}

impl ListenerHandle {
    /// Event kind this listener is registered for
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Raw listener id
    pub fn id(&self) -> u64 {
        self.id
    }
}

struct RegistryInner {
    /// Listeners per event kind, in registration order
    listeners: RwLock<FxHashMap<EventKind, Vec<(u64, Listener)>>>,
    /// Next listener ID
    next_id: AtomicU64,
}

/// Shared registry of global listeners
///
/// Cloning is cheap; clones share the same listeners.
#[derive(Clone)]
pub struct ListenerRegistry {
    inner: Arc<RegistryInner>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = recover(self.inner.listeners.read());
        let counts: Vec<_> = listeners.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("ListenerRegistry")
            .field("listeners", &counts)
            .finish()
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                listeners: RwLock::new(FxHashMap::default()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Register a listener for one event kind
    pub fn subscribe<F>(&self, kind: EventKind, listener: F) -> ListenerHandle
    where
        F: Fn(&HostEvent) -> EventResponse + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        recover(self.inner.listeners.write())
            .entry(kind)
            .or_default()
            .push((id, Arc::new(listener)));

        tracing::trace!("ListenerRegistry: subscribed {:?} listener {}", kind, id);
        ListenerHandle { id, kind }
    }

    /// Remove a listener
    ///
    /// Returns false if the handle was already removed. Safe to call any
    /// number of times.
    pub fn unsubscribe(&self, handle: ListenerHandle) -> bool {
        let mut listeners = recover(self.inner.listeners.write());
        let Some(list) = listeners.get_mut(&handle.kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != handle.id);
        let removed = list.len() != before;
        if removed {
            tracing::trace!(
                "ListenerRegistry: unsubscribed {:?} listener {}",
                handle.kind,
                handle.id
            );
        }
        removed
    }

    /// Remove a listener, failing if it is not registered
    pub fn try_unsubscribe(&self, handle: ListenerHandle) -> Result<()> {
        if self.unsubscribe(handle) {
            Ok(())
        } else {
            Err(CoreError::ListenerNotFound(handle))
        }
    }

    /// Check whether a handle is still registered
    pub fn is_subscribed(&self, handle: ListenerHandle) -> bool {
        recover(self.inner.listeners.read())
            .get(&handle.kind)
            .is_some_and(|list| list.iter().any(|(id, _)| *id == handle.id))
    }

    /// Number of listeners registered for an event kind
    pub fn listener_count(&self, kind: EventKind) -> usize {
        recover(self.inner.listeners.read())
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Deliver an event to every listener of its kind
    ///
    /// Returns the merged response of all listeners.
    pub fn dispatch(&self, event: &HostEvent) -> EventResponse {
        let snapshot: Vec<Listener> = recover(self.inner.listeners.read())
            .get(&event.kind())
            .map(|list| list.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();

        snapshot
            .iter()
            .fold(EventResponse::passive(), |acc, listener| {
                acc.merge(listener(event))
            })
    }
}
