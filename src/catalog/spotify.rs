//! Spotify Web API client: client-credentials auth and album search.

use std::time::Duration;

use base64::engine::general_purpose;
use base64::Engine;
use serde::Deserialize;

use crate::config::CatalogSettings;
use crate::error::{PreviewError, Result};

use super::{Album, AlbumSearch, ReleaseType};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SEARCH_URL: &str = "https://api.spotify.com/v1/search";

/// Application credentials from the Spotify developer dashboard.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    fn basic_auth(&self) -> String {
        let pair = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", general_purpose::STANDARD.encode(pair))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    albums: AlbumPage,
}

#[derive(Debug, Deserialize)]
struct AlbumPage {
    items: Vec<AlbumItem>,
}

#[derive(Debug, Deserialize)]
struct AlbumItem {
    name: String,
    album_type: ReleaseType,
    #[serde(default)]
    release_date: String,
    artists: Vec<Named>,
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: String,
    #[serde(default)]
    width: Option<u32>,
}

impl AlbumItem {
    /// Items without an artist or a cover are useless for a preview.
    fn into_album(self) -> Option<Album> {
        let artist = self.artists.into_iter().next()?.name;
        let cover_url = self
            .images
            .into_iter()
            .max_by_key(|image| image.width.unwrap_or(0))?
            .url;
        Some(Album {
            artist,
            name: self.name,
            album_type: self.album_type,
            release_date: self.release_date,
            cover_url,
        })
    }
}

fn parse_search(response: SearchResponse) -> Vec<Album> {
    response
        .albums
        .items
        .into_iter()
        .filter_map(AlbumItem::into_album)
        .collect()
}

pub struct SpotifyClient {
    agent: ureq::Agent,
    credentials: Credentials,
    settings: CatalogSettings,
    token: Option<String>,
}

impl SpotifyClient {
    pub fn new(credentials: Credentials, settings: CatalogSettings) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(settings.timeout_secs)))
            .build()
            .into();
        Self {
            agent,
            credentials,
            settings,
            token: None,
        }
    }

    /// Access token, requested on first use and kept for the client's
    /// lifetime.
    fn token(&mut self) -> Result<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }

        tracing::debug!("requesting catalog access token");
        let mut response = self
            .agent
            .post(TOKEN_URL)
            .header("Authorization", &self.credentials.basic_auth())
            .send_form([("grant_type", "client_credentials")])
            .map_err(request_error)?;
        let body: TokenResponse = response.body_mut().read_json().map_err(request_error)?;

        self.token = Some(body.access_token.clone());
        Ok(body.access_token)
    }
}

impl AlbumSearch for SpotifyClient {
    fn search(&mut self, query: &str) -> Result<Vec<Album>> {
        let token = self.token()?;
        tracing::info!(query, market = %self.settings.market, "searching catalog");

        let mut response = self
            .agent
            .get(SEARCH_URL)
            .header("Authorization", &format!("Bearer {}", token))
            .query("q", query)
            .query("type", "album")
            .query("limit", self.settings.limit.to_string())
            .query("market", &self.settings.market)
            .call()
            .map_err(request_error)?;
        let body: SearchResponse = response.body_mut().read_json().map_err(request_error)?;
        Ok(parse_search(body))
    }
}

fn request_error(err: ureq::Error) -> PreviewError {
    match err {
        ureq::Error::StatusCode(401) | ureq::Error::StatusCode(400) => PreviewError::Catalog {
            message: "the catalog rejected the credentials".to_string(),
            help: Some("Set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET".to_string()),
        },
        other => PreviewError::catalog(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SEARCH_JSON: &str = r#"{
      "albums": {
        "href": "https://api.spotify.com/v1/search?query=...",
        "items": [
          {
            "album_type": "album",
            "name": "Life Is But a Dream...",
            "release_date": "2023-06-02",
            "artists": [{ "name": "Avenged Sevenfold", "id": "0nmQIMXWTXfhgOBdNzhGOs" }],
            "images": [
              { "url": "https://i.scdn.co/image/small", "width": 64, "height": 64 },
              { "url": "https://i.scdn.co/image/large", "width": 640, "height": 640 }
            ]
          },
          {
            "album_type": "single",
            "name": "Nobody",
            "release_date": "2023-03-14",
            "artists": [{ "name": "Avenged Sevenfold" }],
            "images": []
          }
        ]
      }
    }"#;

    #[test]
    fn test_parse_search_response() {
        let response: SearchResponse = serde_json::from_str(SEARCH_JSON).unwrap();
        let albums = parse_search(response);

        // the single without a cover is dropped
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].artist, "Avenged Sevenfold");
        assert_eq!(albums[0].album_type, ReleaseType::Album);
        assert_eq!(albums[0].cover_url, "https://i.scdn.co/image/large");
    }

    #[test]
    fn test_basic_auth_header() {
        let credentials = Credentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        };
        assert_eq!(credentials.basic_auth(), "Basic aWQ6c2VjcmV0");
    }
}
