//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode between startup and the end of
//! the growth session so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: cryptgrow_core::config::ConfigError,
    },

    /// The configured selections are incomplete.
    #[error("selection error: {source}")]
    Selection {
        /// The underlying selection error.
        #[from]
        source: cryptgrow_types::SelectionError,
    },

    /// The session could not be started.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: cryptgrow_core::session::SessionError,
    },

    /// The session ended without reporting an outcome.
    #[error("session ended without an outcome")]
    NoOutcome,
}
