use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::mixtape::errors::{Error, Result};

/// Decode a JSON `null` as the field's default, the same as a missing field.
///
/// Snapshots written by other tools store empty lists as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Identifier of a playlist.
///
/// Kept as the raw string it was loaded with, so snapshots round-trip
/// untouched. Generation needs the numeric view, see [`PlaylistId::to_number`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    /// The identifier as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the identifier as a base-10 integer.
    pub fn to_number(&self) -> Result<i64> {
        self.0
            .parse::<i64>()
            .map_err(|_| Error::MalformedIdentifier(self.0.clone()))
    }
}

impl From<String> for PlaylistId {
    fn from(id: String) -> Self {
        PlaylistId(id)
    }
}

impl From<&str> for PlaylistId {
    fn from(id: &str) -> Self {
        PlaylistId(id.to_string())
    }
}

impl From<i64> for PlaylistId {
    fn from(n: i64) -> Self {
        PlaylistId(n.to_string())
    }
}

impl PartialEq<str> for PlaylistId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PlaylistId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Owner of playlists. Reference data, never changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id, referenced by `Playlist::user_id`
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A song of the catalog. Reference data, never changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Song id, referenced from `Playlist::song_ids`
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Performing artist
    #[serde(default, deserialize_with = "null_as_default")]
    pub artist: String,
    /// Song title
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

/// A user's ordered list of song ids.
///
/// Song and user ids are not checked against the catalog, and a song may
/// appear more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique within the catalog's playlists
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: PlaylistId,
    /// Owner
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    /// Songs in play order
    #[serde(default, deserialize_with = "null_as_default")]
    pub song_ids: Vec<String>,
}

impl Playlist {
    /// Build a playlist with the given id, owner and songs.
    pub fn new(
        id: impl Into<PlaylistId>,
        user_id: impl Into<String>,
        song_ids: Vec<String>,
    ) -> Self {
        Playlist {
            id: id.into(),
            user_id: user_id.into(),
            song_ids,
        }
    }

    /// Append a song id. No duplicate or existence check.
    pub fn add_song(&mut self, song_id: impl Into<String>) {
        self.song_ids.push(song_id.into());
    }

    /// Number of song entries, duplicates included.
    pub fn len(&self) -> usize {
        self.song_ids.len()
    }

    /// True when the playlist holds no songs.
    pub fn is_empty(&self) -> bool {
        self.song_ids.is_empty()
    }
}
