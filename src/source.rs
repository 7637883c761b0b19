//! Cover image loading from URLs or local files.

use std::path::Path;
use std::time::Duration;

use crate::error::{PreviewError, Result};

/// Upper bound on a downloaded cover image.
const MAX_IMAGE_BYTES: u64 = 32 * 1024 * 1024;

/// Fetches the raw bytes of a cover reference.
///
/// `http://` and `https://` references are downloaded with a bounded
/// timeout; anything else is read from disk.
#[derive(Clone)]
pub struct SourceLoader {
    agent: ureq::Agent,
}

impl SourceLoader {
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }

    pub fn load(&self, source_ref: &str) -> Result<Vec<u8>> {
        if is_remote(source_ref) {
            self.fetch(source_ref)
        } else {
            read_file(source_ref)
        }
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "downloading cover image");
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| PreviewError::image_load(url, e))?;

        response
            .body_mut()
            .with_config()
            .limit(MAX_IMAGE_BYTES)
            .read_to_vec()
            .map_err(|e| PreviewError::image_load(url, e))
    }
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

fn is_remote(source_ref: &str) -> bool {
    let lower = source_ref.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn read_file(path: &str) -> Result<Vec<u8>> {
    tracing::debug!(path, "reading cover image");
    std::fs::read(Path::new(path)).map_err(|e| PreviewError::image_load(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_remote_detection() {
        assert!(is_remote("https://i.scdn.co/image/ab67"));
        assert!(is_remote("HTTP://example.com/a.jpg"));
        assert!(!is_remote("covers/a.jpg"));
        assert!(!is_remote("/tmp/http.jpg"));
    }

    #[test]
    fn test_load_local_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cover.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let loader = SourceLoader::default();
        let bytes = loader.load(path.to_str().unwrap()).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_file_is_image_load_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.jpg");

        let err = SourceLoader::default()
            .load(path.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, PreviewError::ImageLoad { .. }));
    }
}
