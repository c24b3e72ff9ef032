//! Time sources for the timer scheduler

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A monotonic time source
///
/// `now()` is the time elapsed since the clock's own origin. Only differences
/// between readings are meaningful.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current time since the clock's origin
    fn now(&self) -> Duration;
}

/// Shared clock reference
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock backed by `Instant`
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for tests
///
/// Time only moves when `advance` or `set` is called. Clones share the same
/// time, so a test keeps one clone and gives the other to the scheduler.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(to_nanos(by), Ordering::SeqCst);
    }

    /// Jump to an absolute time
    ///
    /// Setting a time earlier than the current one is allowed; timers already
    /// due stay due until they are polled.
    pub fn set(&self, to: Duration) {
        self.nanos.store(to_nanos(to), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

fn to_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);

        clock.advance(Duration::from_millis(150));
        clock.advance(Duration::from_millis(50));
        assert_eq!(clock.now(), Duration::from_millis(200));
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let shared: SharedClock = Arc::new(clock.clone());

        clock.set(Duration::from_secs(3));
        assert_eq!(shared.now(), Duration::from_secs(3));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
