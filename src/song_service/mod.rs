//! Song catalog operations: parameter normalization, listing queries, lyrics
//! paging and lookup backed song creation.

mod enrichment;
mod error;
pub mod lookup;
mod params;
mod query;
mod service;
mod verses;

#[cfg(test)]
mod test_support;

pub use enrichment::{merge_details, AddSongRequest, EnrichmentOrchestrator, ENRICHMENT_DEADLINE};
pub use error::{ErrorCategory, SongError, SongResult};
pub use lookup::{HttpSongDetailsLookup, SongDetails, SongDetailsLookup};
pub use params::{parse_song_id, Filter, ListingParams, Pagination, SongIdParams, VersesParams};
pub use service::{RequestContext, SongService, UpdateSongRequest};
pub use verses::page_verses;
