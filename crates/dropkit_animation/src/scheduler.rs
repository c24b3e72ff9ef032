//! One-shot timer scheduler
//!
//! Timers carry a payload that is handed back when they fire. Nothing runs
//! on a background thread: the host's frame loop (or a test) polls
//! `take_due()` and applies the payloads itself. This keeps every state
//! transition on the caller's thread and makes timing fully deterministic
//! under a `ManualClock`.
//!
//! Cancellation is by id or through a `TimerHandle`, and is idempotent:
//! canceling a timer that already fired or was already canceled is a no-op.

use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use crate::clock::SharedClock;

new_key_type! {
    /// Identifier of a scheduled timer
    pub struct TimerId;
}

struct PendingTimer<E> {
    deadline: Duration,
    /// Scheduling order, breaks ties between equal deadlines
    seq: u64,
    payload: E,
}

struct SchedulerInner<E> {
    timers: SlotMap<TimerId, PendingTimer<E>>,
    next_seq: u64,
}

fn lock<E>(inner: &Mutex<SchedulerInner<E>>) -> MutexGuard<'_, SchedulerInner<E>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scheduler for one-shot timers with payload `E`
///
/// Dropping the scheduler drops every pending timer; outstanding handles
/// become dead and their operations no-op.
pub struct TimerScheduler<E> {
    inner: Arc<Mutex<SchedulerInner<E>>>,
    clock: SharedClock,
}

impl<E> std::fmt::Debug for TimerScheduler<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerScheduler")
            .field("pending", &lock(&self.inner).timers.len())
            .field("clock", &self.clock)
            .finish()
    }
}

impl<E> TimerScheduler<E> {
    /// Create a scheduler reading time from `clock`
    pub fn new(clock: SharedClock) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                timers: SlotMap::with_key(),
                next_seq: 0,
            })),
            clock,
        }
    }

    /// The clock this scheduler reads
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Current time according to the scheduler's clock
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Schedule `payload` to fire after `delay`
    pub fn schedule(&self, delay: Duration, payload: E) -> TimerHandle<E> {
        let deadline = self.clock.now().saturating_add(delay);
        let mut inner = lock(&self.inner);
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let id = inner.timers.insert(PendingTimer {
            deadline,
            seq,
            payload,
        });

        tracing::trace!("TimerScheduler: scheduled {:?} for {:?}", id, deadline);
        TimerHandle {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Cancel a timer by id
    ///
    /// Returns true if the timer was pending.
    pub fn cancel(&self, id: TimerId) -> bool {
        let removed = lock(&self.inner).timers.remove(id).is_some();
        if removed {
            tracing::trace!("TimerScheduler: canceled {:?}", id);
        }
        removed
    }

    /// Cancel every pending timer, returning how many were pending
    pub fn cancel_all(&self) -> usize {
        let mut inner = lock(&self.inner);
        let count = inner.timers.len();
        inner.timers.clear();
        count
    }

    /// Check if a timer is still pending
    pub fn is_pending(&self, id: TimerId) -> bool {
        lock(&self.inner).timers.contains_key(id)
    }

    /// Number of pending timers
    pub fn pending_count(&self) -> usize {
        lock(&self.inner).timers.len()
    }

    /// Earliest deadline among pending timers
    ///
    /// Hosts can sleep until this instant instead of polling every frame.
    pub fn next_deadline(&self) -> Option<Duration> {
        lock(&self.inner).timers.values().map(|t| t.deadline).min()
    }

    /// Remove and return every timer whose deadline has passed
    ///
    /// Timers are returned in deadline order; timers with the same deadline
    /// come back in the order they were scheduled.
    pub fn take_due(&self) -> Vec<(TimerId, E)> {
        let now = self.clock.now();
        let mut inner = lock(&self.inner);

        let mut due: Vec<(TimerId, Duration, u64)> = inner
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= now)
            .map(|(id, t)| (id, t.deadline, t.seq))
            .collect();
        due.sort_by_key(|&(_, deadline, seq)| (deadline, seq));

        due.into_iter()
            .filter_map(|(id, _, _)| inner.timers.remove(id).map(|t| (id, t.payload)))
            .collect()
    }
}

/// Handle to a scheduled timer
///
/// Holds a weak reference to the scheduler; if the scheduler is gone the
/// handle is dead and every operation is a no-op.
pub struct TimerHandle<E> {
    id: TimerId,
    inner: Weak<Mutex<SchedulerInner<E>>>,
}

impl<E> Clone for TimerHandle<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<E> std::fmt::Debug for TimerHandle<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("id", &self.id)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl<E> TimerHandle<E> {
    /// Id of the timer
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Cancel the timer
    ///
    /// Returns true if this call canceled a pending timer. Calling it again,
    /// after the timer fired, or after the scheduler was dropped returns false.
    pub fn cancel(&self) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let removed = lock(&inner).timers.remove(self.id).is_some();
        removed
    }

    /// Check if the timer is still waiting to fire
    pub fn is_pending(&self) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let pending = lock(&inner).timers.contains_key(self.id);
        pending
    }

    /// Check if the owning scheduler still exists
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn scheduler() -> (ManualClock, TimerScheduler<&'static str>) {
        let clock = ManualClock::new();
        let scheduler = TimerScheduler::new(Arc::new(clock.clone()));
        (clock, scheduler)
    }

    #[test]
    fn test_timer_fires_at_deadline() {
        let (clock, scheduler) = scheduler();
        scheduler.schedule(Duration::from_millis(100), "done");

        clock.advance(Duration::from_millis(99));
        assert!(scheduler.take_due().is_empty());

        clock.advance(Duration::from_millis(1));
        let due = scheduler.take_due();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].1, "done");
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_due_timers_in_deadline_then_schedule_order() {
        let (clock, scheduler) = scheduler();
        scheduler.schedule(Duration::from_millis(50), "late");
        scheduler.schedule(Duration::from_millis(10), "first");
        scheduler.schedule(Duration::from_millis(10), "second");

        clock.advance(Duration::from_millis(60));
        let payloads: Vec<_> = scheduler.take_due().into_iter().map(|(_, p)| p).collect();
        assert_eq!(payloads, vec!["first", "second", "late"]);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (clock, scheduler) = scheduler();
        let handle = scheduler.schedule(Duration::from_millis(10), "canceled");

        assert!(handle.is_pending());
        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(!scheduler.cancel(handle.id()));

        clock.advance(Duration::from_millis(20));
        assert!(scheduler.take_due().is_empty());
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let (clock, scheduler) = scheduler();
        let handle = scheduler.schedule(Duration::ZERO, "immediate");
        clock.advance(Duration::from_millis(1));

        assert_eq!(scheduler.take_due().len(), 1);
        assert!(!handle.is_pending());
        assert!(!handle.cancel());
    }

    #[test]
    fn test_next_deadline() {
        let (clock, scheduler) = scheduler();
        assert_eq!(scheduler.next_deadline(), None);

        clock.advance(Duration::from_millis(5));
        scheduler.schedule(Duration::from_millis(30), "b");
        scheduler.schedule(Duration::from_millis(20), "a");
        assert_eq!(scheduler.next_deadline(), Some(Duration::from_millis(25)));
    }

    #[test]
    fn test_handle_weak_reference() {
        let handle = {
            let (_clock, scheduler) = scheduler();
            scheduler.schedule(Duration::from_secs(1), "orphan")
        };

        // Scheduler is dropped, handle should not be alive
        assert!(!handle.is_alive());
        assert!(!handle.is_pending());
        assert!(!handle.cancel());
    }

    #[test]
    fn test_cancel_all() {
        let (_clock, scheduler) = scheduler();
        scheduler.schedule(Duration::from_millis(1), "a");
        scheduler.schedule(Duration::from_millis(2), "b");

        assert_eq!(scheduler.cancel_all(), 2);
        assert_eq!(scheduler.pending_count(), 0);
    }
}
