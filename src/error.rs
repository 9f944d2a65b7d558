//! Error types for lenses and stores.

use thiserror::Error;

/// Errors raised when a lens cannot focus its part of the parent value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LensError {
    /// No list element carries the id the lens was built for.
    #[error("no element with id '{id}' in list")]
    ElementNotFound { id: String },

    /// The index lens points past the end of the list.
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The map does not contain the focused key.
    #[error("key '{key}' not found in map")]
    KeyNotFound { key: String },

    /// The nullable parent value is currently `None`.
    #[error("parent of '{id}' is absent")]
    Absent { id: String },
}

/// Errors surfaced by store operations and reported to a root's error handler.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A sub-store was read or written while its focus could not be resolved.
    #[error("invalid focus at '{path}': {source}")]
    Focus {
        path: String,
        #[source]
        source: LensError,
    },

    /// An update returned an error while being folded.
    #[error("update on store '{store}' failed: {source}")]
    UpdateFailed {
        store: String,
        #[source]
        source: anyhow::Error,
    },

    /// An update panicked while being folded.
    #[error("update on store '{store}' panicked: {message}")]
    UpdatePanicked { store: String, message: String },

    /// The store's scope has been torn down.
    #[error("store '{store}' is closed")]
    Closed { store: String },
}

impl StoreError {
    /// True for errors caused by operating on a torn-down store.
    pub fn is_closed(&self) -> bool {
        matches!(self, StoreError::Closed { .. })
    }
}
