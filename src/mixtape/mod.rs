/// Mixtape aggregate and change application
pub mod catalog;
/// Change sets and the outcome of applying them
pub mod changes;
/// Users, songs, playlists and playlist ids
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Playlist collection with lookup and id generation
pub mod playlists;
/// JSON snapshot storage
pub mod storage;

pub use catalog::Catalog;
pub use changes::{ApplyOutcome, ApplyReport, ChangeSet, Phase};
pub use entities::{Playlist, PlaylistId, Song, User};
pub use errors::{Error, Result};
pub use playlists::Playlists;
pub use storage::{LocalStorage, OutputFormat};
