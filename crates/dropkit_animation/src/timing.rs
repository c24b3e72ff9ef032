//! Enter/exit timing presets
//!
//! Durations are configured in seconds (`f32`) by widget options and turned
//! into validated `Duration`s here.

use std::time::Duration;

use crate::error::{Result, TimingError};

/// Enter and exit durations of a widget's open/close animation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationTiming {
    /// Time from "opening" to "open"
    pub enter: Duration,
    /// Time from "closing" to "closed"
    pub exit: Duration,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self::dropdown()
    }
}

impl AnimationTiming {
    /// Default dropdown timing: 200ms enter, 150ms exit
    pub fn dropdown() -> Self {
        Self {
            enter: Duration::from_millis(200),
            exit: Duration::from_millis(150),
        }
    }

    /// No animation: transitions complete on the next poll
    pub fn instant() -> Self {
        Self {
            enter: Duration::ZERO,
            exit: Duration::ZERO,
        }
    }

    /// Build from seconds, validating both values
    pub fn from_secs(enter: f32, exit: f32) -> Result<Self> {
        Ok(Self {
            enter: seconds("enter_duration", enter)?,
            exit: seconds("exit_duration", exit)?,
        })
    }
}

/// Convert a seconds value into a `Duration`
///
/// Rounded to whole microseconds, so `0.2` is exactly 200ms.
pub fn seconds(name: &'static str, value: f32) -> Result<Duration> {
    if !value.is_finite() {
        return Err(TimingError::NotFinite { name, value });
    }
    if value < 0.0 {
        return Err(TimingError::Negative { name, value });
    }
    Ok(Duration::from_micros((f64::from(value) * 1_000_000.0).round() as u64))
}
