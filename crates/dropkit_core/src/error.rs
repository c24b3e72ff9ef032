//! Core error types

use thiserror::Error;

use crate::listeners::ListenerHandle;

/// Errors raised by the host-facing primitives
#[derive(Error, Debug)]
pub enum CoreError {
    /// A listener handle did not match any registered listener
    #[error("Listener not found: {0:?}")]
    ListenerNotFound(ListenerHandle),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
