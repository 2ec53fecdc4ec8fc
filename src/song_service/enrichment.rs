//! Creation of songs from a title/group pair completed by the lookup service.
//!
//! A single worker task performs the lookup and hands its result over a
//! oneshot channel. The orchestrator races that channel against a deadline and
//! only persists when the worker wins. Sending on a oneshot never blocks, so a
//! worker whose orchestrator already timed out still runs to completion and its
//! result is simply dropped.

use super::error::{SongError, SongResult};
use super::lookup::{SongDetails, SongDetailsLookup};
use super::service::RequestContext;
use crate::song_store::{NewSong, SongStore, RELEASE_DATE_FORMAT};
use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Upper bound on the whole add-song operation.
pub const ENRICHMENT_DEADLINE: Duration = Duration::from_secs(3);

/// Body of `POST /songs`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AddSongRequest {
    pub song: String,
    pub group: String,
}

type EnrichmentResult = Result<NewSong, SongError>;

pub struct EnrichmentOrchestrator {
    lookup: Arc<dyn SongDetailsLookup>,
    store: Arc<dyn SongStore>,
    deadline: Duration,
}

impl EnrichmentOrchestrator {
    pub fn new(lookup: Arc<dyn SongDetailsLookup>, store: Arc<dyn SongStore>) -> Self {
        EnrichmentOrchestrator {
            lookup,
            store,
            deadline: ENRICHMENT_DEADLINE,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub async fn add_song(&self, ctx: &RequestContext, request: AddSongRequest) -> SongResult<()> {
        let deadline = ctx.deadline_within(self.deadline);
        let (tx, rx) = oneshot::channel::<EnrichmentResult>();

        let lookup = Arc::clone(&self.lookup);
        let request_id = ctx.request_id;
        tokio::spawn(async move {
            let result = enrich(lookup.as_ref(), request).await;
            if tx.send(result).is_err() {
                debug!(%request_id, "Enrichment result discarded after deadline");
            }
        });

        let result = tokio::select! {
            _ = tokio::time::sleep_until(deadline) => {
                warn!(
                    request_id = %ctx.request_id,
                    "Song lookup did not finish before the deadline"
                );
                return Err(SongError::ApiCallTimeout);
            }
            received = rx => received
                .map_err(|_| anyhow!("Enrichment worker exited without reporting a result"))?,
        };

        let song = result?;
        let song_id = self
            .store
            .insert_song(&song)
            .context("Failed to persist enriched song")?;
        info!(
            request_id = %ctx.request_id,
            song_id,
            "Added song {:?} by {:?}",
            song.title,
            song.group
        );
        Ok(())
    }
}

async fn enrich(lookup: &dyn SongDetailsLookup, request: AddSongRequest) -> EnrichmentResult {
    let details = lookup
        .fetch_details(&request.group, &request.song)
        .await
        .context("Song lookup failed")?;
    Ok(merge_details(request, details)?)
}

/// Combine the client supplied title and group with looked up details.
pub fn merge_details(request: AddSongRequest, details: SongDetails) -> anyhow::Result<NewSong> {
    let release_date = NaiveDate::parse_from_str(&details.release_date, RELEASE_DATE_FORMAT)
        .with_context(|| {
            format!(
                "Lookup service returned malformed release date {:?}",
                details.release_date
            )
        })?;
    Ok(NewSong {
        title: request.song,
        group: request.group,
        release_date,
        text: details.text,
        link: details.link,
    })
}
