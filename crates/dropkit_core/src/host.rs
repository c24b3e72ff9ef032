//! Host bridge
//!
//! `HostBridge` is how a dropdown reaches the rendering host without
//! linking against it. Four services cross the bridge: measuring an element
//! by id, reading the viewport, moving focus, and scrolling a row into view.
//! The host installs its hooks once and shares the bridge with every
//! dropdown it mounts.
//!
//! ```ignore
//! let host = HostBridge::new();
//! host.set_viewport_size(1280.0, 800.0);
//! host.set_bounds_callback(Arc::new(|id| layout.bounds_of(id)));
//! host.set_focus_callback(Arc::new(|id| router.set_focus(id)));
//! host.set_scroll_callback(Arc::new(|id| render_tree.scroll_into_view(id)));
//! ```
//!
//! Unwired hooks are fine. Measuring yields `None` and focus or scroll
//! requests become no-ops (focus is still recorded on the bridge).

use std::sync::{Arc, RwLock};

use crate::geometry::Bounds;
use crate::recover;

/// Measures a laid-out element
pub type BoundsCallback = Arc<dyn Fn(&str) -> Option<Bounds> + Send + Sync>;

/// Moves host focus; `None` blurs whatever holds it
pub type FocusCallback = Arc<dyn Fn(Option<&str>) + Send + Sync>;

/// Brings an element inside its scroll container's visible area
pub type ScrollCallback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Hooks {
    measure: Option<BoundsCallback>,
    focus: Option<FocusCallback>,
    scroll: Option<ScrollCallback>,
}

#[derive(Default)]
struct Surface {
    viewport: (f32, f32),
    focused: Option<String>,
}

#[derive(Default)]
struct Shared {
    hooks: RwLock<Hooks>,
    surface: RwLock<Surface>,
}

/// Cloneable handle onto the host's services
///
/// All clones see the same hooks, viewport and focus record.
#[derive(Clone, Default)]
pub struct HostBridge {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for HostBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let surface = recover(self.shared.surface.read());
        f.debug_struct("HostBridge")
            .field("viewport", &surface.viewport)
            .field("focused", &surface.focused)
            .finish()
    }
}

impl HostBridge {
    /// A bridge with nothing installed and a zero-sized viewport
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bounds_callback(&self, callback: BoundsCallback) {
        recover(self.shared.hooks.write()).measure = Some(callback);
    }

    /// Layout rect of `id`
    ///
    /// `None` when no measuring hook is installed or the host does not know
    /// the element yet.
    pub fn get_bounds(&self, id: &str) -> Option<Bounds> {
        let measure = recover(self.shared.hooks.read()).measure.clone();
        measure.and_then(|measure| measure(id))
    }

    /// Record the viewport after a resize
    pub fn set_viewport_size(&self, width: f32, height: f32) {
        recover(self.shared.surface.write()).viewport = (width, height);
    }

    /// `(width, height)` of the viewport
    pub fn viewport_size(&self) -> (f32, f32) {
        recover(self.shared.surface.read()).viewport
    }

    pub fn set_focus_callback(&self, callback: FocusCallback) {
        recover(self.shared.hooks.write()).focus = Some(callback);
    }

    /// Move focus to `id`, or blur with `None`
    pub fn set_focus(&self, id: Option<&str>) {
        recover(self.shared.surface.write()).focused = id.map(str::to_owned);

        // Hook runs outside the lock so it can call back into the bridge
        let focus = recover(self.shared.hooks.read()).focus.clone();
        if let Some(focus) = focus {
            focus(id);
        }
    }

    pub fn focused_element(&self) -> Option<String> {
        recover(self.shared.surface.read()).focused.clone()
    }

    pub fn is_focused(&self, id: &str) -> bool {
        recover(self.shared.surface.read()).focused.as_deref() == Some(id)
    }

    pub fn set_scroll_callback(&self, callback: ScrollCallback) {
        recover(self.shared.hooks.write()).scroll = Some(callback);
    }

    pub fn scroll_element_into_view(&self, id: &str) {
        let scroll = recover(self.shared.hooks.read()).scroll.clone();
        if let Some(scroll) = scroll {
            scroll(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_bounds_without_callback() {
        let host = HostBridge::new();
        assert_eq!(host.get_bounds("trigger"), None);
    }

    #[test]
    fn test_bounds_callback() {
        let host = HostBridge::new();
        host.set_bounds_callback(Arc::new(|id| {
            (id == "trigger").then(|| Bounds::new(0.0, 0.0, 100.0, 30.0))
        }));

        assert_eq!(
            host.get_bounds("trigger"),
            Some(Bounds::new(0.0, 0.0, 100.0, 30.0))
        );
        assert_eq!(host.get_bounds("missing"), None);
    }

    #[test]
    fn test_focus_tracking() {
        let host = HostBridge::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = Arc::clone(&seen);
        host.set_focus_callback(Arc::new(move |id| {
            seen_cb.lock().unwrap().push(id.map(str::to_string));
        }));

        host.set_focus(Some("search"));
        assert!(host.is_focused("search"));
        host.set_focus(None);
        assert_eq!(host.focused_element(), None);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some("search".to_string()), None]
        );
    }

    #[test]
    fn test_focus_callback_may_reenter_bridge() {
        let host = HostBridge::new();
        let inner = host.clone();
        let observed = Arc::new(Mutex::new(None));
        let observed_cb = Arc::clone(&observed);
        host.set_focus_callback(Arc::new(move |_| {
            *observed_cb.lock().unwrap() = inner.focused_element();
        }));

        host.set_focus(Some("list"));
        assert_eq!(*observed.lock().unwrap(), Some("list".to_string()));
    }

    #[test]
    fn test_viewport_size_shared_between_clones() {
        let host = HostBridge::new();
        let clone = host.clone();
        host.set_viewport_size(800.0, 600.0);
        assert_eq!(clone.viewport_size(), (800.0, 600.0));
    }
}
