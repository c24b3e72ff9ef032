//! Timing error types

use thiserror::Error;

/// Errors raised when building animation timings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimingError {
    /// Duration is below zero
    #[error("{name} must not be negative (got {value}s)")]
    Negative { name: &'static str, value: f32 },

    /// Duration is NaN or infinite
    #[error("{name} must be a finite number of seconds (got {value})")]
    NotFinite { name: &'static str, value: f32 },
}

/// Result type for timing operations
pub type Result<T> = std::result::Result<T, TimingError>;
