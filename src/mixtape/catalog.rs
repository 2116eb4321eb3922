use serde::{Deserialize, Serialize};

use crate::mixtape::changes::{ApplyOutcome, ApplyReport, ChangeSet, NewPlaylist, Phase};
use crate::mixtape::entities::{Playlist, PlaylistId, Song, User, null_as_default};
use crate::mixtape::errors::{Error, Result};
use crate::mixtape::playlists::Playlists;

/// The mixtape: users, playlists and songs, loaded and saved as one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Playlist owners
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<User>,
    /// Playlists in storage order
    #[serde(default)]
    pub playlists: Playlists,
    /// Songs that playlists refer to
    #[serde(default, deserialize_with = "null_as_default")]
    pub songs: Vec<Song>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a playlist with a generated id and return that id.
    ///
    /// The playlist must carry at least one song. Nothing is checked against
    /// the users or songs of the catalog. On error the catalog is untouched.
    pub fn create_playlist(&mut self, playlist: NewPlaylist) -> Result<PlaylistId> {
        if playlist.song_ids.is_empty() {
            return Err(Error::EmptyPlaylist);
        }

        let id = self.playlists.next_id()?;
        self.playlists
            .push(Playlist::new(id.clone(), playlist.user_id, playlist.song_ids));
        Ok(id)
    }

    /// Remove the playlist with the given id and hand it back.
    pub fn remove_playlist(&mut self, id: &str) -> Result<Playlist> {
        self.playlists.remove(id)
    }

    /// Append `song_ids` in order to an existing playlist. Duplicates are kept.
    pub fn add_songs_to_playlist(&mut self, id: &str, song_ids: &[String]) -> Result<()> {
        let playlist = self
            .playlists
            .find_mut(id)
            .ok_or_else(|| Error::PlaylistNotFound(PlaylistId::from(id)))?;

        for song_id in song_ids {
            playlist.add_song(song_id.as_str());
        }
        Ok(())
    }

    /// Apply a change set: all creations, then all deletions, then all song
    /// additions, each in input order.
    ///
    /// Stops at the first failing item. Items applied before it stay applied,
    /// which the returned [`ApplyOutcome::PartiallyApplied`] reports.
    pub fn apply_changes(&mut self, changes: ChangeSet) -> ApplyOutcome {
        let mut report = ApplyReport::default();
        let changes = changes.playlists;

        for (index, playlist) in changes.new.into_iter().enumerate() {
            match self.create_playlist(playlist) {
                Ok(id) => report.created.push(id),
                Err(error) => return partial(report, Phase::Create, index, error),
            }
        }

        for (index, id) in changes.delete.playlist_ids.into_iter().enumerate() {
            match self.remove_playlist(id.as_str()) {
                Ok(_) => report.deleted.push(id),
                Err(error) => return partial(report, Phase::Delete, index, error),
            }
        }

        for (index, add) in changes.add_songs.iter().enumerate() {
            match self.add_songs_to_playlist(add.playlist_id.as_str(), &add.song_ids) {
                Ok(()) => report.songs_added += add.song_ids.len(),
                Err(error) => return partial(report, Phase::AddSongs, index, error),
            }
        }

        ApplyOutcome::Applied(report)
    }

    /// Number of users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of playlists.
    pub fn playlist_count(&self) -> usize {
        self.playlists.len()
    }

    /// Number of songs.
    pub fn song_count(&self) -> usize {
        self.songs.len()
    }
}

fn partial(report: ApplyReport, phase: Phase, index: usize, error: Error) -> ApplyOutcome {
    ApplyOutcome::PartiallyApplied {
        report,
        phase,
        index,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixtape::changes::AddSongs;

    fn songs(ids: &[&str]) -> Vec<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    fn catalog_with(playlists: &[(&str, &str)]) -> Catalog {
        Catalog {
            playlists: playlists
                .iter()
                .map(|(id, song_id)| Playlist::new(*id, "1", songs(&[*song_id])))
                .collect(),
            ..Catalog::default()
        }
    }

    #[test]
    fn create_in_empty_catalog_gets_first_id() {
        let mut catalog = Catalog::new();
        let id = catalog
            .create_playlist(NewPlaylist::new("3", songs(&["1"])))
            .unwrap();

        assert_eq!(id, "1");
        assert_eq!(catalog.playlist_count(), 1);
        let created = catalog.playlists.find("1").unwrap();
        assert_eq!(created.user_id, "3");
        assert_eq!(created.song_ids, vec!["1"]);
    }

    #[test]
    fn create_uses_the_generated_id() {
        let mut catalog = catalog_with(&[("1", "a"), ("2", "b"), ("5", "c")]);
        let expected = catalog.playlists.next_id().unwrap();

        let id = catalog
            .create_playlist(NewPlaylist::new("1", songs(&["x", "y"])))
            .unwrap();

        assert_eq!(id, expected);
        assert_eq!(id, "6");
        assert_eq!(catalog.playlists.iter().last().unwrap().id, "6");
    }

    #[test]
    fn create_without_songs_fails_and_changes_nothing() {
        let mut catalog = catalog_with(&[("1", "a")]);
        let before = catalog.clone();

        let err = catalog
            .create_playlist(NewPlaylist::new("1", Vec::new()))
            .unwrap_err();

        assert!(matches!(err, Error::EmptyPlaylist));
        assert_eq!(catalog, before);
    }

    #[test]
    fn create_with_malformed_ids_changes_nothing() {
        let mut catalog = catalog_with(&[("1", "a"), ("abc", "b")]);
        let before = catalog.clone();

        let err = catalog
            .create_playlist(NewPlaylist::new("1", songs(&["c"])))
            .unwrap_err();

        assert!(matches!(err, Error::MalformedIdentifier(id) if id == "abc"));
        assert_eq!(catalog, before);
    }

    #[test]
    fn remove_playlist() {
        let mut catalog = catalog_with(&[("1", "a"), ("2", "b")]);
        catalog.remove_playlist("1").unwrap();
        assert!(catalog.playlists.find("1").is_none());
        assert_eq!(catalog.playlist_count(), 1);

        let err = catalog.remove_playlist("1").unwrap_err();
        assert!(matches!(err, Error::PlaylistNotFound(_)));
    }

    #[test]
    fn add_songs_appends_in_order() {
        let mut catalog = catalog_with(&[("1", "x")]);
        catalog
            .add_songs_to_playlist("1", &songs(&["x", "y"]))
            .unwrap();
        assert_eq!(
            catalog.playlists.find("1").unwrap().song_ids,
            vec!["x", "x", "y"]
        );
    }

    #[test]
    fn add_songs_to_missing_playlist() {
        let mut catalog = catalog_with(&[("1", "x")]);
        let err = catalog
            .add_songs_to_playlist("2", &songs(&["y"]))
            .unwrap_err();
        assert!(matches!(err, Error::PlaylistNotFound(id) if id == "2"));
    }

    #[test]
    fn apply_creates_before_deleting() {
        let mut catalog = catalog_with(&[("1", "a")]);
        let changes = ChangeSet::default()
            .with_new(NewPlaylist::new("1", songs(&["b"])))
            .with_delete("1");

        let report = catalog.apply_changes(changes).into_result().unwrap();

        assert_eq!(report.created, vec![PlaylistId::from("2")]);
        assert_eq!(report.deleted, vec![PlaylistId::from("1")]);
        assert_eq!(catalog.playlist_count(), 1);
        let remaining = catalog.playlists.find("2").unwrap();
        assert_eq!(remaining.song_ids, vec!["b"]);
    }

    #[test]
    fn apply_adds_songs_to_created_playlists() {
        let mut catalog = Catalog::new();
        let changes = ChangeSet::default()
            .with_new(NewPlaylist::new("1", songs(&["a"])))
            .with_add_songs(AddSongs::new("1", songs(&["b", "c"])));

        let outcome = catalog.apply_changes(changes);

        assert!(outcome.is_applied());
        assert_eq!(outcome.report().songs_added, 2);
        assert_eq!(
            catalog.playlists.find("1").unwrap().song_ids,
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn apply_stops_at_first_error_without_rollback() {
        let mut catalog = Catalog::new();
        let changes = ChangeSet::default()
            .with_new(NewPlaylist::new("1", songs(&["a"])))
            .with_delete("42")
            .with_delete("1")
            .with_add_songs(AddSongs::new("1", songs(&["b"])));

        let outcome = catalog.apply_changes(changes);

        match &outcome {
            ApplyOutcome::PartiallyApplied {
                report,
                phase,
                index,
                error,
            } => {
                assert_eq!(*phase, Phase::Delete);
                assert_eq!(*index, 0);
                assert!(matches!(error, Error::PlaylistNotFound(id) if id == "42"));
                assert_eq!(report.created, vec![PlaylistId::from("1")]);
                assert!(report.deleted.is_empty());
            }
            ApplyOutcome::Applied(_) => panic!("expected a partial outcome"),
        }

        // the created playlist stays, later items never ran
        assert_eq!(catalog.playlists.find("1").unwrap().song_ids, vec!["a"]);
        assert!(matches!(outcome.error(), Some(Error::PlaylistNotFound(_))));
        assert!(matches!(
            outcome.into_result(),
            Err(Error::PlaylistNotFound(_))
        ));
    }

    #[test]
    fn apply_reports_index_within_phase() {
        let mut catalog = Catalog::new();
        let changes = ChangeSet::default()
            .with_new(NewPlaylist::new("1", songs(&["a"])))
            .with_new(NewPlaylist::new("1", songs(&["b"])))
            .with_new(NewPlaylist::new("1", Vec::new()));

        let outcome = catalog.apply_changes(changes);

        assert!(matches!(
            outcome,
            ApplyOutcome::PartiallyApplied {
                phase: Phase::Create,
                index: 2,
                error: Error::EmptyPlaylist,
                ..
            }
        ));
        assert_eq!(catalog.playlist_count(), 2);
    }

    #[test]
    fn empty_change_set_is_a_no_op() {
        let mut catalog = catalog_with(&[("1", "a")]);
        let before = catalog.clone();

        let report = catalog
            .apply_changes(ChangeSet::default())
            .into_result()
            .unwrap();

        assert_eq!(report, ApplyReport::default());
        assert_eq!(catalog, before);
    }

    #[test]
    fn applied_outcome_has_no_error() {
        let mut catalog = Catalog::new();
        let changes = ChangeSet::default().with_new(NewPlaylist::new("1", songs(&["a"])));
        let outcome = catalog.apply_changes(changes);

        assert!(outcome.is_applied());
        assert!(outcome.error().is_none());
    }

    #[test]
    fn snapshot_with_null_lists_loads() {
        let json = r#"{
            "users": null,
            "playlists": [{"id": "1", "user_id": "2", "song_ids": null}],
            "songs": [{"id": "1"}]
        }"#;
        let mut catalog: Catalog = serde_json::from_str(json).unwrap();

        assert_eq!(catalog.user_count(), 0);
        assert!(catalog.playlists.find("1").unwrap().is_empty());
        assert_eq!(catalog.songs[0].artist, "");

        let before = catalog.clone();
        catalog
            .add_songs_to_playlist("1", &songs(&["1"]))
            .unwrap();
        assert_ne!(catalog, before);

        let json = r#"{"users": [], "playlists": null, "songs": null}"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog, Catalog::new());
        assert_eq!(catalog, before);
    }

    #[test]
    fn snapshot_has_three_top_level_fields() {
        let catalog = catalog_with(&[("1", "a")]);
        let value = serde_json::to_value(&catalog).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["playlists", "songs", "users"]);
        assert_eq!(value["playlists"][0]["id"], "1");
        assert_eq!(value["playlists"][0]["song_ids"][0], "a");
    }
}
