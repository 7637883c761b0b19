//! Release lookup against the music catalog.
//!
//! A lookup searches the catalog, narrows the results to the queried
//! artist, lets a [`Chooser`] pick one release and caches the pick on disk.

mod cache;
mod select;
mod spotify;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PreviewError, Result};

pub use cache::AlbumCache;
pub use select::{filter_candidates, rank, PromptChooser, RankedChooser};
pub use spotify::{Credentials, SpotifyClient};

/// Kind of release, as the catalog labels it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Album,
    Single,
    Compilation,
}

impl ReleaseType {
    /// Preference among equally close matches; lower wins.
    pub fn preference(self) -> u8 {
        match self {
            ReleaseType::Single => 0,
            ReleaseType::Album => 1,
            ReleaseType::Compilation => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ReleaseType::Album => "album",
            ReleaseType::Single => "single",
            ReleaseType::Compilation => "compilation",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The release facts a preview needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// First credited artist.
    pub artist: String,
    pub name: String,
    pub album_type: ReleaseType,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`; sorts chronologically as text.
    pub release_date: String,
    /// Largest cover image.
    pub cover_url: String,
}

impl Album {
    /// `Artist - Name`, the form queries are written in.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.name)
    }
}

/// Something that can search the catalog for releases.
pub trait AlbumSearch {
    fn search(&mut self, query: &str) -> Result<Vec<Album>>;
}

/// Strategy for picking one release among several candidates.
pub trait Chooser {
    /// `candidates` is never empty.
    fn choose(&self, query: &str, candidates: Vec<Album>) -> Result<Album>;
}

/// Options for one lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupOptions {
    /// Ignore the cache and query the catalog.
    pub refresh: bool,
    /// Only accept releases of this type.
    pub release_type: Option<ReleaseType>,
}

/// Find the release matching `query` (`Artist - Title`).
pub fn find_album(
    search: &mut dyn AlbumSearch,
    cache: &AlbumCache,
    chooser: &dyn Chooser,
    query: &str,
    options: LookupOptions,
) -> Result<Album> {
    let query = query.trim();
    if query.is_empty() {
        return Err(PreviewError::Catalog {
            message: "empty search query".to_string(),
            help: Some("Search as \"Artist - Title\"".to_string()),
        });
    }

    if !options.refresh {
        if let Some(album) = cache.get(query)? {
            tracing::debug!(query, "catalog cache hit");
            return Ok(album);
        }
    }

    let results = search.search(query)?;
    tracing::debug!(query, results = results.len(), "catalog search");

    let candidates = filter_candidates(query, results, options.release_type);
    if candidates.is_empty() {
        return Err(PreviewError::Catalog {
            message: format!("no release matches '{}'", query),
            help: Some("The artist must match the part before \" - \" exactly".to_string()),
        });
    }

    let album = chooser.choose(query, candidates)?;
    cache.put(query, &album)?;
    Ok(album)
}

/// Drop a trailing parenthesised suffix: `Dream (Deluxe)` becomes `Dream`.
pub fn remove_parentheses(name: &str) -> &str {
    let trimmed = name.trim_end();
    if let Some(body) = trimmed.strip_suffix(')') {
        let from = body.rfind(')').map_or(0, |i| i + 1);
        if let Some(open) = body[from..].find('(') {
            return trimmed[..from + open].trim();
        }
    }
    name.trim()
}
