//! The song service facade and the request context threaded through it.

use super::enrichment::{AddSongRequest, EnrichmentOrchestrator};
use super::error::{SongError, SongResult};
use super::lookup::SongDetailsLookup;
use super::params::{Filter, Pagination};
use super::verses::page_verses;
use crate::song_store::{NewSong, Song, SongQuery, SongStore, RELEASE_DATE_FORMAT};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// Request scoped metadata threaded through service calls.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: Uuid,
    /// Point in time after which the caller no longer waits for an answer.
    pub deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new() -> Self {
        RequestContext {
            request_id: Uuid::new_v4(),
            deadline: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// The earlier of the caller deadline and `limit` from now.
    pub fn deadline_within(&self, limit: Duration) -> Instant {
        let bound = Instant::now() + limit;
        match self.deadline {
            Some(deadline) if deadline < bound => deadline,
            _ => bound,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Body of `PUT /song`.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateSongRequest {
    pub song: String,
    pub group: String,
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    pub text: String,
    pub link: String,
}

impl UpdateSongRequest {
    fn into_new_song(self) -> SongResult<NewSong> {
        let release_date = NaiveDate::parse_from_str(&self.release_date, RELEASE_DATE_FORMAT)
            .map_err(|_| SongError::InvalidDate)?;
        Ok(NewSong {
            title: self.song,
            group: self.group,
            release_date,
            text: self.text,
            link: self.link,
        })
    }
}

/// Entry point of every song operation.
pub struct SongService {
    store: Arc<dyn SongStore>,
    enrichment: EnrichmentOrchestrator,
}

impl SongService {
    pub fn new(store: Arc<dyn SongStore>, lookup: Arc<dyn SongDetailsLookup>) -> Self {
        SongService {
            enrichment: EnrichmentOrchestrator::new(lookup, store.clone()),
            store,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_enrichment(mut self, enrichment: EnrichmentOrchestrator) -> Self {
        self.enrichment = enrichment;
        self
    }

    /// List songs matching `filter`. An empty page is [`SongError::NoSongs`].
    pub fn list_songs(
        &self,
        ctx: &RequestContext,
        pagination: Pagination,
        filter: Filter,
    ) -> SongResult<Vec<Song>> {
        // A window beyond the i64 range lies past any stored row.
        let window = pagination.window().ok_or(SongError::NoSongs)?;
        let songs = if filter.is_empty() {
            self.store.list_songs(window)?
        } else {
            let query = SongQuery::build(&filter, window);
            debug!(request_id = %ctx.request_id, "Listing songs with {:?}", query);
            self.store.list_songs_by_query(&query)?
        };

        if songs.is_empty() {
            return Err(SongError::NoSongs);
        }
        Ok(songs)
    }

    pub fn song_verses(
        &self,
        ctx: &RequestContext,
        id: i64,
        pagination: Pagination,
    ) -> SongResult<Vec<String>> {
        let text = self.store.get_song_text(id)?.ok_or_else(|| {
            debug!(request_id = %ctx.request_id, song_id = id, "Song not found");
            SongError::NoSongs
        })?;
        page_verses(&text, &pagination)
    }

    pub fn delete_song(&self, ctx: &RequestContext, id: i64) -> SongResult<()> {
        self.store.delete_song(id)?;
        info!(request_id = %ctx.request_id, song_id = id, "Deleted song");
        Ok(())
    }

    pub fn update_song(
        &self,
        ctx: &RequestContext,
        id: i64,
        request: UpdateSongRequest,
    ) -> SongResult<()> {
        let song = request.into_new_song()?;
        self.store.update_song(id, &song)?;
        info!(request_id = %ctx.request_id, song_id = id, "Updated song");
        Ok(())
    }

    pub async fn add_song(&self, ctx: &RequestContext, request: AddSongRequest) -> SongResult<()> {
        self.enrichment.add_song(ctx, request).await
    }
}
