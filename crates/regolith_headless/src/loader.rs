//! Data directory loading.
//!
//! A data directory holds one RON file per definition table (see
//! [`DataFile`]). Every file is required; a missing or malformed file is a
//! startup failure, never a silently empty table.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use regolith_core::catalog::Catalog;
use regolith_core::data::{DataFile, GameData};
use regolith_core::error::GameError;
use thiserror::Error;

/// Environment variable overriding the data directory search.
pub const DATA_DIR_ENV: &str = "REGOLITH_DATA_DIR";

/// Errors raised while loading a data directory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The data directory does not exist.
    #[error("Data directory not found: {0}")]
    DirectoryNotFound(String),

    /// A data file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A data file parsed badly or the data failed validation.
    #[error(transparent)]
    Data(#[from] GameError),
}

/// Read every data file in `dir` into a [`GameData`].
///
/// Files are read in [`DataFile::ALL`] order; the first failure stops the load.
pub fn load_game_data(dir: &Path) -> Result<GameData, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::DirectoryNotFound(dir.display().to_string()));
    }

    let mut data = GameData::default();
    for file in DataFile::ALL {
        let path = dir.join(file.file_name());
        let path_str = path.display().to_string();
        let text = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path_str.clone(),
            source,
        })?;
        data.load_file(file, &path_str, &text)?;
        tracing::debug!("Loaded {}", path_str);
    }
    Ok(data)
}

/// Load and validate a data directory into a shared catalog.
pub fn load_catalog(dir: &Path) -> Result<Arc<Catalog>, LoadError> {
    let data = load_game_data(dir)?;
    let catalog = Catalog::from_data(data)?;
    tracing::info!(
        "Catalog loaded from {}: {} resources, {} buildings, {} commands, {} events",
        dir.display(),
        catalog.resources.len(),
        catalog.buildings.len(),
        catalog.commands.len(),
        catalog.events.len()
    );
    Ok(Arc::new(catalog))
}

/// Find the default data directory.
///
/// Checks [`DATA_DIR_ENV`] first, then the standard locations relative to
/// the working directory.
pub fn default_data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        let path = PathBuf::from(dir);
        if path.is_dir() {
            return Some(path);
        }
        tracing::warn!("{} points at a missing directory: {}", DATA_DIR_ENV, path.display());
    }

    let candidates = ["assets/data", "../assets/data", "../../assets/data"];
    candidates
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_dir())
}

/// Resolve an explicit directory or fall back to [`default_data_dir`].
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf, LoadError> {
    match explicit {
        Some(dir) => Ok(dir),
        None => default_data_dir()
            .ok_or_else(|| LoadError::DirectoryNotFound("game data directory".to_string())),
    }
}
