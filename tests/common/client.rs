//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all song library endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Songs
    // ========================================================================

    /// GET /songs with the given query parameters
    pub async fn list_songs(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(self.url("/songs"))
            .query(query)
            .send()
            .await
            .expect("List songs request failed")
    }

    /// POST /songs
    pub async fn add_song(&self, song: &str, group: &str) -> Response {
        self.client
            .post(self.url("/songs"))
            .json(&json!({ "song": song, "group": group }))
            .send()
            .await
            .expect("Add song request failed")
    }

    // ========================================================================
    // Single Song
    // ========================================================================

    /// GET /song?id=..&page=..&size=..
    pub async fn get_verses(&self, id: &str, page: Option<&str>, size: Option<&str>) -> Response {
        let mut query = vec![("id", id)];
        if let Some(page) = page {
            query.push(("page", page));
        }
        if let Some(size) = size {
            query.push(("size", size));
        }
        self.client
            .get(self.url("/song"))
            .query(&query)
            .send()
            .await
            .expect("Get verses request failed")
    }

    /// PUT /song?id=.. with a raw JSON body
    pub async fn update_song_raw(&self, id: &str, body: String) -> Response {
        self.client
            .put(self.url("/song"))
            .query(&[("id", id)])
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Update song request failed")
    }

    /// PUT /song?id=..
    pub async fn update_song(
        &self,
        id: &str,
        song: &str,
        group: &str,
        release_date: &str,
        text: &str,
        link: &str,
    ) -> Response {
        let body = json!({
            "song": song,
            "group": group,
            "releaseDate": release_date,
            "text": text,
            "link": link,
        });
        self.update_song_raw(id, body.to_string()).await
    }

    /// DELETE /song?id=..
    pub async fn delete_song(&self, id: &str) -> Response {
        self.client
            .delete(self.url("/song"))
            .query(&[("id", id)])
            .send()
            .await
            .expect("Delete song request failed")
    }

    /// Any method on any path, for routing tests
    pub async fn request(&self, method: reqwest::Method, path: &str) -> Response {
        self.client
            .request(method, self.url(path))
            .send()
            .await
            .expect("Request failed")
    }
}
