//! On-disk cache of catalog lookups, one JSON file per query.

use std::fs;
use std::path::PathBuf;

use crate::error::{PreviewError, Result};
use crate::output::filename_with_extension;

use super::Album;

#[derive(Debug, Clone)]
pub struct AlbumCache {
    dir: PathBuf,
}

impl AlbumCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File a query's result is cached in.
    pub fn path_for(&self, query: &str) -> PathBuf {
        self.dir.join(filename_with_extension(query.trim(), "json"))
    }

    /// Cached album for `query`. A corrupt entry counts as a miss.
    pub fn get(&self, query: &str) -> Result<Option<Album>> {
        let path = self.path_for(query);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| PreviewError::Io {
            path: path.clone(),
            message: format!("Failed to read cache entry: {}", e),
        })?;
        match serde_json::from_str(&content) {
            Ok(album) => Ok(Some(album)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt cache entry");
                Ok(None)
            }
        }
    }

    pub fn put(&self, query: &str, album: &Album) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| PreviewError::Io {
            path: self.dir.clone(),
            message: format!("Failed to create cache directory: {}", e),
        })?;

        let path = self.path_for(query);
        let json = serde_json::to_string_pretty(album).map_err(|e| PreviewError::Io {
            path: path.clone(),
            message: format!("Failed to serialize cache entry: {}", e),
        })?;
        fs::write(&path, json).map_err(|e| PreviewError::Io {
            path,
            message: format!("Failed to write cache entry: {}", e),
        })
    }
}
