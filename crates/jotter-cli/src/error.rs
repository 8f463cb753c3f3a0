use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] jotter_core::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    /// A failure the display surface has already shown to the user.
    #[error("{0}")]
    Reported(String),
    #[error("Note position or ID cannot be empty")]
    EmptyNoteTarget,
    #[error("Note not found for position/id: {0}")]
    NoteNotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error(
        "Not signed in. Run `jotter auth login --email <EMAIL> --password <PASSWORD>` first."
    )]
    NotSignedIn,
}

impl CliError {
    /// Wrap a note operation failure that was already printed as a message.
    pub fn reported(error: impl fmt::Display) -> Self {
        Self::Reported(error.to_string())
    }

    pub const fn already_shown(&self) -> bool {
        matches!(self, Self::Reported(_))
    }
}
