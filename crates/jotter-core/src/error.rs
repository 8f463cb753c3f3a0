//! Error types for jotter-core

use thiserror::Error;

use crate::store::StoreError;

/// Result type alias using jotter-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the note list operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure to load the note list from the document store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Failed to load notes: {0}")]
    Unknown(String),
}

/// Failure to create or overwrite a note
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("User not logged in")]
    NotAuthenticated,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to save: {0}")]
    Unknown(String),
}

/// Failure to delete a note
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeleteError {
    #[error("User not logged in")]
    NotAuthenticated,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to delete: {0}")]
    Unknown(String),
}

impl From<StoreError> for FetchError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Network(message) => Self::Network(message),
            StoreError::PermissionDenied(message) => Self::PermissionDenied(message),
            StoreError::Unknown(message) => Self::Unknown(message),
        }
    }
}

impl From<StoreError> for SaveError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Network(message) => Self::Network(message),
            StoreError::PermissionDenied(_) => Self::NotAuthenticated,
            StoreError::Unknown(message) => Self::Unknown(message),
        }
    }
}

impl From<StoreError> for DeleteError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Network(message) => Self::Network(message),
            StoreError::PermissionDenied(_) => Self::NotAuthenticated,
            StoreError::Unknown(message) => Self::Unknown(message),
        }
    }
}
