//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("No element definition registered for type: {0}")]
    DefinitionNotFound(String),

    #[error("Stale element reference: {0}")]
    StaleReference(String),

    #[error("Operation would create a cycle involving: {0}")]
    CycleDetected(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Editor Result type alias
pub type EditorResult<T> = Result<T, EditorError>;
