use std::path::Path;

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::mixtape::catalog::Catalog;
use crate::mixtape::changes::ChangeSet;
use crate::mixtape::errors::Result;

/// Layout of a stored catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab indented, one field per line
    #[default]
    Pretty,
    /// Single line, no whitespace
    Compact,
}

/// Reads and writes mixtape snapshots and change sets as JSON files.
///
/// A missing or unreadable file surfaces as `StorageError`, content that does
/// not decode into the expected shape as `SerializationError`.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    format: OutputFormat,
}

impl LocalStorage {
    /// Storage writing catalogs in `format`.
    pub fn new(format: OutputFormat) -> Self {
        LocalStorage { format }
    }

    /// Layout used when storing.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Read a mixtape snapshot.
    pub async fn load_catalog(&self, path: impl AsRef<Path>) -> Result<Catalog> {
        let catalog: Catalog = read_json(path.as_ref()).await?;
        debug!(
            "Loaded mixtape from {:?}: {} users, {} playlists, {} songs",
            path.as_ref(),
            catalog.user_count(),
            catalog.playlist_count(),
            catalog.song_count()
        );
        Ok(catalog)
    }

    /// Read a change set.
    pub async fn load_changes(&self, path: impl AsRef<Path>) -> Result<ChangeSet> {
        let changes: ChangeSet = read_json(path.as_ref()).await?;
        debug!(
            "Loaded {} changes from {:?}",
            changes.len(),
            path.as_ref()
        );
        Ok(changes)
    }

    /// Write a mixtape snapshot, replacing the file.
    pub async fn store_catalog(&self, path: impl AsRef<Path>, catalog: &Catalog) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.encode(catalog)?;
        tokio::fs::write(path, bytes).await?;
        debug!("Stored mixtape in {path:?}");
        Ok(())
    }

    /// Encode a catalog the way [`LocalStorage::store_catalog`] writes it.
    pub fn encode(&self, catalog: &Catalog) -> Result<Vec<u8>> {
        match self.format {
            OutputFormat::Compact => Ok(serde_json::to_vec(catalog)?),
            OutputFormat::Pretty => {
                let mut buf = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
                let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
                catalog.serialize(&mut ser)?;
                Ok(buf)
            }
        }
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = tokio::fs::read(path).await.inspect_err(|e| {
        debug!("Failed to read {path:?}: {e}");
    })?;
    Ok(serde_json::from_slice(&contents)?)
}
