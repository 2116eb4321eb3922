use log::{debug, info, warn};
use mixtaper::mixtape::{
    ApplyOutcome, LocalStorage, OutputFormat,
    errors::{Error, Result},
};
use std::env::{self, VarError};
use std::path::PathBuf;

const DEFAULT_MIXTAPE_PATH: &str = "./testdata/mixtape.json";
const DEFAULT_CHANGES_PATH: &str = "./testdata/changes.json";
const DEFAULT_OUTPUT_PATH: &str = "./testdata/output.json";

// Configuration for the Runner struct
#[derive(Debug)]
pub struct Config {
    pub storage: LocalStorage,
    pub mixtape_path: PathBuf,
    pub changes_path: PathBuf,
    pub output_path: PathBuf,
}

pub struct ConfigBuilder {
    mixtape_path: Option<PathBuf>,
    changes_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    format: Option<OutputFormat>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            mixtape_path: None,
            changes_path: None,
            output_path: None,
            format: None, // Pretty, tab indented output unless asked otherwise
        }
    }

    pub fn mixtape_path(mut self, path: Option<PathBuf>) -> Self {
        self.mixtape_path = path;
        self
    }

    pub fn changes_path(mut self, path: Option<PathBuf>) -> Self {
        self.changes_path = path;
        self
    }

    pub fn output_path(mut self, path: Option<PathBuf>) -> Self {
        self.output_path = path;
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    // Paths not set explicitly come from the environment, then from defaults
    pub fn build(self) -> Result<Config> {
        let mixtape_path = match self.mixtape_path {
            Some(p) => p,
            None => path_from_env("MIXTAPE_PATH", DEFAULT_MIXTAPE_PATH)?,
        };
        let changes_path = match self.changes_path {
            Some(p) => p,
            None => path_from_env("MIXTAPE_CHANGES_PATH", DEFAULT_CHANGES_PATH)?,
        };
        let output_path = match self.output_path {
            Some(p) => p,
            None => path_from_env("MIXTAPE_OUTPUT_PATH", DEFAULT_OUTPUT_PATH)?,
        };
        Ok(Config {
            storage: LocalStorage::new(self.format.unwrap_or_default()),
            mixtape_path,
            changes_path,
            output_path,
        })
    }
}

fn path_from_env(key: &str, default: &str) -> Result<PathBuf> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        Ok(_) | Err(VarError::NotPresent) => Ok(PathBuf::from(default)),
        Err(e) => Err(Error::from(e)),
    }
}

// Loads a mixtape, applies a change set and writes the result
pub struct Runner {
    config: Config,
}

impl Runner {
    pub fn new(config: Config) -> Self {
        Runner { config }
    }

    pub async fn apply(&self) -> Result<()> {
        let storage = &self.config.storage;

        info!("Loading mixtape from {:?} ...", self.config.mixtape_path);
        let mut catalog = storage.load_catalog(&self.config.mixtape_path).await?;
        info!("Loading changes from {:?} ...", self.config.changes_path);
        let changes = storage.load_changes(&self.config.changes_path).await?;

        if changes.is_empty() {
            info!("Change set is empty, mixtape is written unchanged");
        }

        debug!("Applying {} changes ...", changes.len());
        let report = match catalog.apply_changes(changes) {
            ApplyOutcome::Applied(report) => report,
            ApplyOutcome::PartiallyApplied {
                report,
                phase,
                index,
                error,
            } => {
                // Nothing is written, the snapshot on disk stays as it was
                warn!(
                    "Change {index} of the {phase} phase failed after {} created and {} deleted playlists",
                    report.created.len(),
                    report.deleted.len()
                );
                return Err(error);
            }
        };

        info!(
            "Applied changes: {} playlists created {:?}, {} deleted, {} songs added",
            report.created.len(),
            report.created,
            report.deleted.len(),
            report.songs_added
        );

        storage
            .store_catalog(&self.config.output_path, &catalog)
            .await?;
        info!(
            "Mixtape with {} playlists written to {:?}",
            catalog.playlist_count(),
            self.config.output_path
        );
        Ok(())
    }

    pub async fn show(&self) -> Result<()> {
        let catalog = self
            .config
            .storage
            .load_catalog(&self.config.mixtape_path)
            .await?;

        info!(
            "{:?}: {} users, {} playlists, {} songs",
            self.config.mixtape_path,
            catalog.user_count(),
            catalog.playlist_count(),
            catalog.song_count()
        );
        for playlist in &catalog.playlists {
            info!(
                "  playlist {} (user {}): {} songs",
                playlist.id,
                playlist.user_id,
                playlist.len()
            );
        }
        Ok(())
    }
}
