//! Mixtaper - apply batches of playlist changes to a mixtape
//!
//! A mixtape is a JSON snapshot of users, playlists and songs. This library
//! loads it, applies a change set (create, delete, add songs) and writes the
//! updated snapshot back.

/// Mixtape data model, change application and JSON storage
pub mod mixtape;
