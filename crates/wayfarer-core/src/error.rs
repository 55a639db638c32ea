//! Error types for the wayfarer core library

use thiserror::Error;

/// Core error type for search and decision-process operations
#[derive(Error, Debug)]
pub enum WayfarerError {
    /// The search problem did not supply a start state
    #[error("Search problem has no start state")]
    MissingStartState,

    /// A decision point required an action but none was legal
    #[error("No legal actions for agent {agent}")]
    NoLegalActions {
        /// Index of the agent that had to move
        agent: usize,
    },

    /// A search strategy name that is not known
    #[error("Unknown search strategy: {0}")]
    UnknownStrategy(String),

    /// A required path does not exist
    #[error("No path: {0}")]
    NoPath(String),

    /// Invalid action
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Invalid state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A configuration value out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for wayfarer operations
pub type Result<T> = std::result::Result<T, WayfarerError>;
