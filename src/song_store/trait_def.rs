//! SongStore trait definition.
//!
//! The service layer only talks to storage through this trait, so the SQLite
//! driver can be swapped for an in-memory fake in tests.

use super::models::{NewSong, PageWindow, Song, SongQuery};
use anyhow::Result;

/// Trait for song storage backends.
pub trait SongStore: Send + Sync {
    // =========================================================================
    // Listing
    // =========================================================================

    /// List songs ordered by id ascending, bounded by `window`.
    fn list_songs(&self, window: PageWindow) -> Result<Vec<Song>>;

    /// Run a listing query produced by the query builder.
    fn list_songs_by_query(&self, query: &SongQuery) -> Result<Vec<Song>>;

    // =========================================================================
    // Single Song Access
    // =========================================================================

    /// Get the lyrics text of a song, `None` if the song does not exist.
    fn get_song_text(&self, id: i64) -> Result<Option<String>>;

    fn get_song(&self, id: i64) -> Result<Option<Song>>;

    fn count_songs(&self) -> Result<usize>;

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Insert a song and return its assigned id.
    fn insert_song(&self, song: &NewSong) -> Result<i64>;

    /// Replace every mutable field of a song. Unknown ids are a no-op.
    fn update_song(&self, id: i64, song: &NewSong) -> Result<()>;

    /// Delete a song. Unknown ids are a no-op.
    fn delete_song(&self, id: i64) -> Result<()>;
}
