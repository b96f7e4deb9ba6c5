//! Engine error handling
//!
//! Errors raised while registering subsystems, resolving unit actions or
//! loading configuration. None of them are fatal: the orchestrator logs them
//! per subsystem and the encounter keeps running.

use thiserror::Error;

/// Errors surfaced by the encounter engines
#[derive(Debug, Error)]
pub enum EngineError {
    /// Registration was attempted without a subsystem instance
    #[error("subsystem '{0}' was registered without an instance")]
    MissingSubsystem(String),

    /// An operation needed a collaborator that is not wired in
    #[error("collaborator '{0}' is not available")]
    MissingCollaborator(&'static str),

    /// Entity is gone or lacks the requested component
    #[error("component error: {0}")]
    Component(#[from] hecs::ComponentError),

    /// Entity is gone or does not satisfy a single-entity query
    #[error("query error: {0}")]
    QueryOne(#[from] hecs::QueryOneError),

    /// The entity was despawned before the write reached it
    #[error("entity no longer exists")]
    NoSuchEntity(#[from] hecs::NoSuchEntity),

    /// A subsystem panicked during one of its passes
    #[error("subsystem '{name}' panicked: {message}")]
    SubsystemPanicked { name: String, message: String },

    /// Invalid configuration values
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration could not be parsed
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// IO error while reading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Failures that are expected in normal play and only worth a debug line.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            EngineError::MissingCollaborator(_) | EngineError::NoSuchEntity(_)
        )
    }
}
