use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mixtape::entities::{PlaylistId, null_as_default};
use crate::mixtape::errors::{Error, Result};

/// A batch of playlist changes, applied once and then dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Playlist sub-commands
    #[serde(default, deserialize_with = "null_as_default")]
    pub playlists: PlaylistChanges,
}

/// The three sub-commands, applied in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistChanges {
    /// Playlists to create
    #[serde(default, deserialize_with = "null_as_default")]
    pub new: Vec<NewPlaylist>,
    /// Playlists to remove
    #[serde(default, deserialize_with = "null_as_default")]
    pub delete: DeletePlaylists,
    /// Songs to append to existing playlists
    #[serde(default, deserialize_with = "null_as_default")]
    pub add_songs: Vec<AddSongs>,
}

/// Playlist to create. Any `id` in the input is ignored, a fresh one is
/// generated when the playlist is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlaylist {
    /// Owner
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    /// Initial songs, at least one
    #[serde(default, deserialize_with = "null_as_default")]
    pub song_ids: Vec<String>,
}

/// Ids of playlists to remove.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePlaylists {
    /// Removed in this order
    #[serde(default, deserialize_with = "null_as_default")]
    pub playlist_ids: Vec<PlaylistId>,
}

/// Songs to append to one playlist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddSongs {
    /// Target playlist
    #[serde(default, deserialize_with = "null_as_default")]
    pub playlist_id: PlaylistId,
    /// Appended in this order
    #[serde(default, deserialize_with = "null_as_default")]
    pub song_ids: Vec<String>,
}

impl NewPlaylist {
    /// Playlist for `user_id` holding `song_ids`.
    pub fn new(user_id: impl Into<String>, song_ids: Vec<String>) -> Self {
        NewPlaylist {
            user_id: user_id.into(),
            song_ids,
        }
    }
}

impl AddSongs {
    /// Append `song_ids` to `playlist_id`.
    pub fn new(playlist_id: impl Into<PlaylistId>, song_ids: Vec<String>) -> Self {
        AddSongs {
            playlist_id: playlist_id.into(),
            song_ids,
        }
    }
}

impl ChangeSet {
    /// Total number of items across all phases.
    pub fn len(&self) -> usize {
        self.playlists.new.len()
            + self.playlists.delete.playlist_ids.len()
            + self.playlists.add_songs.len()
    }

    /// True when no phase has any item.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a playlist to create.
    pub fn with_new(mut self, playlist: NewPlaylist) -> Self {
        self.playlists.new.push(playlist);
        self
    }

    /// Add a playlist id to remove.
    pub fn with_delete(mut self, playlist_id: impl Into<PlaylistId>) -> Self {
        self.playlists.delete.playlist_ids.push(playlist_id.into());
        self
    }

    /// Add songs to append.
    pub fn with_add_songs(mut self, add: AddSongs) -> Self {
        self.playlists.add_songs.push(add);
        self
    }
}

/// Phases of a change set, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// New playlists
    Create,
    /// Playlist removals
    Delete,
    /// Song appends
    AddSongs,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Create => "create",
            Phase::Delete => "delete",
            Phase::AddSongs => "add-songs",
        };
        f.write_str(name)
    }
}

/// What an apply call actually changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Ids assigned to new playlists, in creation order
    pub created: Vec<PlaylistId>,
    /// Ids of removed playlists, in removal order
    pub deleted: Vec<PlaylistId>,
    /// Song ids appended over all add-songs items
    pub songs_added: usize,
}

/// Outcome of applying a change set.
///
/// Applying stops at the first failing item and never rolls back, so a
/// failure still carries the report of everything applied before it.
#[derive(Debug)]
pub enum ApplyOutcome {
    /// Every item was applied
    Applied(ApplyReport),
    /// An item failed; everything before it stays applied
    PartiallyApplied {
        /// Items applied before the failure
        report: ApplyReport,
        /// Phase of the failing item
        phase: Phase,
        /// Position of the failing item within its phase
        index: usize,
        /// Error of the failing item
        error: Error,
    },
}

impl ApplyOutcome {
    /// True when the whole change set went through.
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied(_))
    }

    /// What was applied, in full or up to the failure.
    pub fn report(&self) -> &ApplyReport {
        match self {
            ApplyOutcome::Applied(report) | ApplyOutcome::PartiallyApplied { report, .. } => report,
        }
    }

    /// The error that stopped applying, if any.
    pub fn error(&self) -> Option<&Error> {
        match self {
            ApplyOutcome::Applied(_) => None,
            ApplyOutcome::PartiallyApplied { error, .. } => Some(error),
        }
    }

    /// Drop the partial report and surface the first error as-is.
    pub fn into_result(self) -> Result<ApplyReport> {
        match self {
            ApplyOutcome::Applied(report) => Ok(report),
            ApplyOutcome::PartiallyApplied { error, .. } => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_change_set() {
        let json = r#"{
            "playlists": {
                "new": [{"id": "99", "user_id": "2", "song_ids": ["1", "2"]}],
                "delete": {"playlist_ids": ["3"]},
                "add_songs": [{"playlist_id": "1", "song_ids": ["5"]}]
            }
        }"#;
        let changes: ChangeSet = serde_json::from_str(json).unwrap();

        assert_eq!(
            changes.playlists.new,
            vec![NewPlaylist::new("2", vec!["1".into(), "2".into()])]
        );
        assert_eq!(
            changes.playlists.delete.playlist_ids,
            vec![PlaylistId::from("3")]
        );
        assert_eq!(changes.playlists.add_songs[0].playlist_id, "1");
        assert_eq!(changes.len(), 3);
    }

    #[test]
    fn missing_sub_commands_mean_nothing_to_do() {
        let changes: ChangeSet = serde_json::from_str(r#"{"playlists": {"new": []}}"#).unwrap();
        assert!(changes.is_empty());

        let changes: ChangeSet = serde_json::from_str("{}").unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn null_sub_commands_mean_nothing_to_do() {
        let json = r#"{
            "playlists": {
                "new": null,
                "delete": {"playlist_ids": null},
                "add_songs": [{"playlist_id": "1", "song_ids": null}]
            }
        }"#;
        let changes: ChangeSet = serde_json::from_str(json).unwrap();
        assert!(changes.playlists.new.is_empty());
        assert!(changes.playlists.delete.playlist_ids.is_empty());
        assert_eq!(changes.playlists.add_songs, vec![AddSongs::new("1", Vec::new())]);

        let changes: ChangeSet =
            serde_json::from_str(r#"{"playlists": {"delete": null}}"#).unwrap();
        assert!(changes.is_empty());
        let changes: ChangeSet = serde_json::from_str(r#"{"playlists": null}"#).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let result = serde_json::from_str::<ChangeSet>(r#"{"playlists": {"delete": ["1"]}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn into_result_returns_error_verbatim() {
        let outcome = ApplyOutcome::PartiallyApplied {
            report: ApplyReport {
                created: vec![PlaylistId::from(4_i64)],
                ..ApplyReport::default()
            },
            phase: Phase::Delete,
            index: 0,
            error: Error::PlaylistNotFound(PlaylistId::from("7")),
        };
        assert!(!outcome.is_applied());
        assert_eq!(outcome.report().created, vec![PlaylistId::from(4_i64)]);
        assert!(matches!(outcome.error(), Some(Error::PlaylistNotFound(_))));

        let err = outcome.into_result().unwrap_err();
        assert!(matches!(err, Error::PlaylistNotFound(id) if id == "7"));
    }

    #[test]
    fn phase_names() {
        assert_eq!(Phase::Create.to_string(), "create");
        assert_eq!(Phase::AddSongs.to_string(), "add-songs");
    }
}
