//! Outside-interaction detection
//!
//! While the dropdown is open, pointer-down and touch-start events anywhere
//! in the host are checked against the dropdown's boundary region (trigger
//! plus panel). A press outside the region invokes the outside callback;
//! presses inside are ignored.
//!
//! Listeners are passive and only exist while open. They are detached as
//! soon as the dropdown closes or the detector is dropped.

use std::sync::{Arc, RwLock};

use smallvec::SmallVec;

use dropkit_core::{
    recover, EventKind, EventResponse, ListenerHandle, ListenerRegistry, PointerEvent, Region,
};

type OutsideCallback = Arc<dyn Fn() + Send + Sync>;

/// Detects presses outside a boundary region
pub struct OutsideClickDetector {
    registry: ListenerRegistry,
    boundary: Arc<RwLock<Region>>,
    on_outside: OutsideCallback,
    handles: SmallVec<[ListenerHandle; 2]>,
}

impl std::fmt::Debug for OutsideClickDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutsideClickDetector")
            .field("boundary", &*recover(self.boundary.read()))
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl OutsideClickDetector {
    /// Create a detached detector
    pub fn new<F>(registry: ListenerRegistry, on_outside: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            registry,
            boundary: Arc::new(RwLock::new(Region::new())),
            on_outside: Arc::new(on_outside),
            handles: SmallVec::new(),
        }
    }

    /// Replace the boundary region
    ///
    /// Takes effect for the next event, attached or not.
    pub fn set_boundary(&self, region: Region) {
        *recover(self.boundary.write()) = region;
    }

    /// Current boundary region
    pub fn boundary(&self) -> Region {
        recover(self.boundary.read()).clone()
    }

    /// Whether a press lies outside the boundary
    ///
    /// An empty boundary (nothing laid out yet) never counts as outside.
    pub fn is_outside(&self, event: &PointerEvent) -> bool {
        press_is_outside(&*recover(self.boundary.read()), event)
    }

    /// Attach listeners while open, detach them otherwise
    pub fn sync(&mut self, is_open: bool) {
        if is_open {
            self.attach();
        } else {
            self.detach();
        }
    }

    /// Whether listeners are currently registered
    pub fn is_attached(&self) -> bool {
        !self.handles.is_empty()
    }

    fn attach(&mut self) {
        if self.is_attached() {
            return;
        }
        for kind in [EventKind::PointerDown, EventKind::TouchStart] {
            let boundary = Arc::clone(&self.boundary);
            let on_outside = Arc::clone(&self.on_outside);
            let handle = self.registry.subscribe(kind, move |event| {
                if let Some(pointer) = event.pointer() {
                    if press_is_outside(&*recover(boundary.read()), pointer) {
                        tracing::trace!("OutsideClickDetector: press at ({}, {})", pointer.x, pointer.y);
                        on_outside();
                    }
                }
                EventResponse::passive()
            });
            self.handles.push(handle);
        }
        tracing::trace!("OutsideClickDetector: attached");
    }

    /// Remove every listener; safe to call when already detached
    pub fn detach(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        for handle in self.handles.drain(..) {
            self.registry.unsubscribe(handle);
        }
        tracing::trace!("OutsideClickDetector: detached");
    }
}

impl Drop for OutsideClickDetector {
    fn drop(&mut self) {
        self.detach();
    }
}

fn press_is_outside(boundary: &Region, pointer: &PointerEvent) -> bool {
    !boundary.is_empty() && !boundary.contains(pointer.x, pointer.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropkit_core::{Bounds, HostEvent};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn detector() -> (ListenerRegistry, Arc<AtomicUsize>, OutsideClickDetector) {
        let registry = ListenerRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let detector = OutsideClickDetector::new(registry.clone(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        detector.set_boundary(
            Region::from_bounds(Bounds::new(0.0, 0.0, 100.0, 30.0))
                .with(Bounds::new(0.0, 34.0, 100.0, 200.0)),
        );
        (registry, hits, detector)
    }

    #[test]
    fn test_press_outside_fires() {
        let (registry, hits, mut detector) = detector();
        detector.sync(true);

        registry.dispatch(&HostEvent::PointerDown(PointerEvent::mouse(500.0, 500.0)));
        registry.dispatch(&HostEvent::TouchStart(PointerEvent::touch(150.0, 10.0)));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_press_inside_is_ignored() {
        let (registry, hits, mut detector) = detector();
        detector.sync(true);

        // trigger, then panel
        registry.dispatch(&HostEvent::PointerDown(PointerEvent::mouse(50.0, 15.0)));
        registry.dispatch(&HostEvent::PointerDown(PointerEvent::mouse(50.0, 100.0)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listeners_only_while_open() {
        let (registry, hits, mut detector) = detector();
        registry.dispatch(&HostEvent::PointerDown(PointerEvent::mouse(500.0, 500.0)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        detector.sync(true);
        detector.sync(true);
        assert_eq!(registry.listener_count(EventKind::PointerDown), 1);
        assert_eq!(registry.listener_count(EventKind::TouchStart), 1);

        detector.sync(false);
        assert!(!detector.is_attached());
        assert_eq!(registry.listener_count(EventKind::PointerDown), 0);
        assert_eq!(registry.listener_count(EventKind::TouchStart), 0);

        registry.dispatch(&HostEvent::PointerDown(PointerEvent::mouse(500.0, 500.0)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listeners_are_passive() {
        let (registry, _hits, mut detector) = detector();
        detector.sync(true);
        let response = registry.dispatch(&HostEvent::PointerDown(PointerEvent::mouse(500.0, 0.0)));
        assert!(!response.prevent_default);
    }

    #[test]
    fn test_empty_boundary_never_outside() {
        let (_registry, _hits, detector) = detector();
        detector.set_boundary(Region::new());
        assert!(!detector.is_outside(&PointerEvent::mouse(999.0, 999.0)));
    }

    #[test]
    fn test_boundary_change_seen_by_attached_listener() {
        let (registry, hits, mut detector) = detector();
        detector.sync(true);
        assert!(detector.is_outside(&PointerEvent::mouse(500.0, 500.0)));

        detector.set_boundary(Region::from_bounds(Bounds::new(400.0, 400.0, 200.0, 200.0)));
        assert!(!detector.is_outside(&PointerEvent::mouse(500.0, 500.0)));
        registry.dispatch(&HostEvent::PointerDown(PointerEvent::mouse(500.0, 500.0)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        registry.dispatch(&HostEvent::PointerDown(PointerEvent::mouse(50.0, 15.0)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_detaches() {
        let (registry, _hits, mut detector) = detector();
        detector.sync(true);
        drop(detector);
        assert_eq!(registry.listener_count(EventKind::PointerDown), 0);
    }
}
