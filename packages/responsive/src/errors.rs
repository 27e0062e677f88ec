//! Error types for the responsive registry

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResponsiveError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Common(#[from] pagecraft_common::CommonError),
}

/// Responsive Result type alias
pub type ResponsiveResult<T> = Result<T, ResponsiveError>;
