//! Dropdown error types

use thiserror::Error;

use dropkit_animation::TimingError;

/// Errors raised by the dropdown
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DropdownError {
    /// A part looked up the dropdown context outside of any root
    #[error("`{consumer}` must be used inside a `DropdownRoot` context scope")]
    MissingContext { consumer: &'static str },

    /// Enter or exit duration is unusable
    #[error("invalid animation timing: {0}")]
    InvalidTiming(#[from] TimingError),

    /// A settings value is out of range
    #[error("invalid dropdown settings: {0}")]
    InvalidSettings(String),
}

/// Result type for dropdown operations
pub type Result<T> = std::result::Result<T, DropdownError>;
