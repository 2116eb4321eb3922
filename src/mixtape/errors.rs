use thiserror::Error;

use crate::mixtape::entities::PlaylistId;

/// Result alias used across the mixtape modules
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading, changing or storing a mixtape
#[derive(Error, Debug)]
pub enum Error {
    /// A playlist was created without songs
    #[error("New playlist requires at least one song")]
    EmptyPlaylist,

    /// No playlist with this id exists
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// An existing id does not parse as an integer, so no next id can be generated
    #[error("Playlist identifier is not an integer: {0:?}")]
    MalformedIdentifier(String),

    /// The largest existing id has no integer successor
    #[error("Playlist identifier {0} is the largest possible, no next id can be generated")]
    IdentifierOverflow(PlaylistId),

    /// Reading or writing a file failed
    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    /// Content is not JSON of the expected shape
    #[error("Failed to encode or decode JSON, error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Environment holds an unusable setting
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl Error {
    /// True for the errors raised by catalog operations, as opposed to I/O,
    /// decoding or configuration failures.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Error::EmptyPlaylist
                | Error::PlaylistNotFound(_)
                | Error::MalformedIdentifier(_)
                | Error::IdentifierOverflow(_)
        )
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}
