//! Error types for the observer registry.

use thiserror::Error;

/// Error returned by an observer or subscriber handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a single handler invocation.
pub type HandlerResult = std::result::Result<(), HandlerError>;

/// A handler that failed during a dispatch pass.
#[derive(Debug, Error)]
#[error("handler at index {index} failed: {source}")]
pub struct HandlerFailure {
    /// Position of the failing handler in the dispatch snapshot.
    pub index: usize,
    #[source]
    pub source: HandlerError,
}

/// Main error type for registry operations.
///
/// Removing an observer or subscription that is not registered is not an
/// error: those calls return `false` and leave the registry unchanged.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Index out of range: {index} (len is {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Handler(#[from] HandlerFailure),
}

impl RegistryError {
    /// The handler failure behind this error, if any.
    pub fn handler_failure(&self) -> Option<&HandlerFailure> {
        match self {
            RegistryError::Handler(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Why a channel-backed subscriber could not take a delivery.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("subscriber channel is full")]
    Full,

    #[error("subscriber channel is disconnected")]
    Disconnected,
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
