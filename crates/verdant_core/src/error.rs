//! Engine error types

use thiserror::Error;

/// Conditions under which an engine entry point does nothing
///
/// None of these are fatal. Public entry points swallow them and return
/// `None` (or nothing) so the page degrades to static, unanimated content.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// A required element handle was absent
    #[error("required element is missing")]
    MissingInput,

    /// Engine modules were not loaded within the bounded wait
    #[error("engine modules are not ready")]
    NotReady,

    /// The document is not interactive (pre-render or headless pass)
    #[error("no interactive document")]
    NoRuntime,

    /// The container is already driven by a live smooth scroll controller
    #[error("container already has a smooth scroll controller")]
    AlreadyAttached,
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
