//! Dropkit Core
//!
//! This crate provides the host-facing primitives shared by every Dropkit
//! widget:
//!
//! - **Geometry**: `Bounds` and `Region` for trigger/panel rectangles
//! - **Input Events**: Key codes, pointer events and the `HostEvent` envelope
//! - **Host Bridge**: Injected capabilities (bounds lookup, viewport size,
//!   focus requests, scroll-into-view)
//! - **Global Listeners**: A registry that routes host events to the widgets
//!   that are currently listening
//! - **Instance Keys**: Stable unique keys used to derive element ids
//!
//! # Example
//!
//! ```rust
//! use dropkit_core::{Bounds, EventKind, EventResponse, HostEvent, ListenerRegistry, PointerEvent};
//!
//! let registry = ListenerRegistry::new();
//! let handle = registry.subscribe(EventKind::PointerDown, |_event| EventResponse::passive());
//!
//! registry.dispatch(&HostEvent::PointerDown(PointerEvent::mouse(10.0, 10.0)));
//! assert_eq!(registry.listener_count(EventKind::PointerDown), 1);
//!
//! registry.unsubscribe(handle);
//! assert_eq!(registry.listener_count(EventKind::PointerDown), 0);
//!
//! let trigger = Bounds::new(0.0, 0.0, 100.0, 32.0);
//! assert!(trigger.contains(50.0, 16.0));
//! ```

pub mod error;
pub mod events;
pub mod geometry;
pub mod host;
pub mod key;
pub mod listeners;

pub use error::{CoreError, Result};
pub use events::{EventKind, EventResponse, HostEvent, KeyCode, KeyEvent, PointerEvent, PointerKind};
pub use geometry::{Bounds, Region};
pub use host::{BoundsCallback, FocusCallback, HostBridge, ScrollCallback};
pub use key::InstanceKey;
pub use listeners::{Listener, ListenerHandle, ListenerRegistry};

use std::sync::{LockResult, PoisonError};

/// Recover the guard from a lock result, ignoring poisoning
///
/// Listener and host callbacks run user code; a panic inside one must not
/// wedge every later dispatch.
pub fn recover<G>(result: LockResult<G>) -> G {
    result.unwrap_or_else(PoisonError::into_inner)
}
