use serde::{Deserialize, Serialize};

use crate::mixtape::entities::{Playlist, PlaylistId, null_as_default};
use crate::mixtape::errors::{Error, Result};

/// Ordered playlist collection owned by a catalog.
///
/// Insertion order is the storage order. Lookups hand out references into
/// the collection, so edits through [`Playlists::find_mut`] change the stored
/// playlist itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Playlists(#[serde(deserialize_with = "null_as_default")] Vec<Playlist>);

impl Playlists {
    /// An empty collection.
    pub fn new() -> Self {
        Playlists(Vec::new())
    }

    /// First playlist with the given id, if any.
    pub fn find(&self, id: &str) -> Option<&Playlist> {
        self.0.iter().find(|p| p.id == id)
    }

    /// Mutable handle to the first playlist with the given id, if any.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Playlist> {
        self.0.iter_mut().find(|p| p.id == id)
    }

    /// Id for the next playlist: one past the largest existing id, or "1"
    /// for an empty collection.
    ///
    /// Derived from the current contents only, so removing the highest
    /// playlist frees its id for reuse. Every id must parse as an integer,
    /// otherwise `MalformedIdentifier`. A largest id of `i64::MAX` has no
    /// successor and gives `IdentifierOverflow`.
    pub fn next_id(&self) -> Result<PlaylistId> {
        let mut max: Option<i64> = None;
        for playlist in &self.0 {
            let n = playlist.id.to_number()?;
            max = Some(max.map_or(n, |m| m.max(n)));
        }

        match max {
            None => Ok(PlaylistId::from(1_i64)),
            Some(m) => m
                .checked_add(1)
                .map(PlaylistId::from)
                .ok_or_else(|| Error::IdentifierOverflow(PlaylistId::from(m))),
        }
    }

    /// Remove the first playlist with the given id, keeping the others in order.
    pub fn remove(&mut self, id: &str) -> Result<Playlist> {
        let index = self
            .0
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::PlaylistNotFound(PlaylistId::from(id)))?;
        Ok(self.0.remove(index))
    }

    /// Append a playlist as is, keeping its id.
    pub fn push(&mut self, playlist: Playlist) {
        self.0.push(playlist);
    }

    /// Playlists in storage order.
    pub fn iter(&self) -> std::slice::Iter<'_, Playlist> {
        self.0.iter()
    }

    /// Ids in storage order.
    pub fn ids(&self) -> impl Iterator<Item = &PlaylistId> {
        self.0.iter().map(|p| &p.id)
    }

    /// Number of playlists.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no playlists.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Playlist> for Playlists {
    fn from_iter<I: IntoIterator<Item = Playlist>>(iter: I) -> Self {
        Playlists(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Playlists {
    type Item = &'a Playlist;
    type IntoIter = std::slice::Iter<'a, Playlist>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
