//! Dropkit Animation Timing
//!
//! Widgets in Dropkit do not tween anything themselves; the rendering layer
//! owns the actual animation. What a widget needs is to know *when* an enter
//! or exit animation is over so it can flip its own state. This crate
//! provides that:
//!
//! - **Clocks**: `SystemClock` for real time, `ManualClock` for deterministic
//!   tests and replay
//! - **Timer Scheduler**: One-shot timers carrying a payload, cancelable by
//!   handle, fired by polling from the host's frame loop
//! - **Timing Presets**: Enter/exit durations for common widgets
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use dropkit_animation::{ManualClock, TimerScheduler};
//!
//! let clock = ManualClock::new();
//! let scheduler = TimerScheduler::new(Arc::new(clock.clone()));
//!
//! let timer = scheduler.schedule(Duration::from_millis(200), "enter-complete");
//! assert!(scheduler.take_due().is_empty());
//!
//! clock.advance(Duration::from_millis(200));
//! let due = scheduler.take_due();
//! assert_eq!(due.len(), 1);
//! assert_eq!(due[0].1, "enter-complete");
//! assert!(!timer.is_pending());
//! ```

pub mod clock;
pub mod error;
pub mod scheduler;
pub mod timing;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use error::{Result, TimingError};
pub use scheduler::{TimerHandle, TimerId, TimerScheduler};
pub use timing::AnimationTiming;
