//! Error types for the Redwood Portal application
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to the frontend.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tauri error: {0}")]
    Tauri(#[from] tauri::Error),

    #[error("The sheet endpoint is not configured")]
    StoreNotConfigured,

    #[error("The sheet rejected the request: {0}")]
    StoreRejected(String),

    #[error("The magic word does not resonate")]
    MagicWordRejected,

    #[error("No guest is signed in")]
    NotSignedIn,

    #[error("Only the keeper of the grove may do that")]
    NotAuthorized,

    #[error("Note is empty")]
    EmptyNote,

    #[error("Note is too long: {len} of at most {max} characters")]
    NoteTooLong { len: usize, max: usize },

    #[error("Unknown mood: {0}")]
    UnknownMood(String),

    #[error("A response for event {0} is already being recorded")]
    UpdateInFlight(String),

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
