//! Client for the external song details lookup service.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Payload returned by the lookup service for a title/group pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDetails {
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    pub text: String,
    pub link: String,
}

/// Source of release date, lyrics and link for a song.
#[async_trait]
pub trait SongDetailsLookup: Send + Sync {
    async fn fetch_details(&self, group: &str, song: &str) -> Result<SongDetails>;
}

/// Build `<base>?group=<group>&song=<song>`.
pub fn lookup_url(base_url: &str, group: &str, song: &str) -> Result<Url> {
    Url::parse_with_params(base_url, &[("group", group), ("song", song)])
        .with_context(|| format!("Invalid lookup service URL {:?}", base_url))
}

/// HTTP implementation of [`SongDetailsLookup`].
pub struct HttpSongDetailsLookup {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSongDetailsLookup {
    /// Create a new lookup client.
    ///
    /// # Arguments
    /// * `base_url` - Full URL of the lookup endpoint (e.g., "http://localhost:8081/info")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: String, timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl SongDetailsLookup for HttpSongDetailsLookup {
    async fn fetch_details(&self, group: &str, song: &str) -> Result<SongDetails> {
        let url = lookup_url(&self.base_url, group, song)?;
        debug!("Fetching song details from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to connect to lookup service")?;

        if response.status() != StatusCode::OK {
            bail!(
                "Lookup of {:?} by {:?} failed with status {}",
                song,
                group,
                response.status()
            );
        }

        response
            .json()
            .await
            .context("Failed to parse lookup service response")
    }
}
