//! Seed data for the test song database

use super::constants::*;
use anyhow::Result;
use chrono::NaiveDate;
use song_library_server::song_store::{NewSong, SongStore, SqliteSongStore};
use tempfile::TempDir;

fn date(raw: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(raw, "%d.%m.%Y")?)
}

/// Creates a temporary song database holding the five seeded songs, in id order.
/// Returns (temp_dir, store, song ids)
pub fn create_test_library() -> Result<(TempDir, SqliteSongStore, Vec<i64>)> {
    let dir = TempDir::new()?;
    let store = SqliteSongStore::new(dir.path().join("songs.db"), 2)?;

    let songs = [
        (SONG_1_TITLE, SONG_1_GROUP, SONG_1_RELEASE_DATE, SONG_1_VERSES.join("\n\n")),
        (SONG_2_TITLE, SONG_2_GROUP, "14.09.2009", "Paranoia is in bloom".to_string()),
        (SONG_3_TITLE, SONG_3_GROUP, "03.09.2007", "Far away".to_string()),
        (SONG_4_TITLE, SONG_4_GROUP, "26.06.2000", String::new()),
        (SONG_5_TITLE, SONG_5_GROUP, "26.06.2000", "The lights go out".to_string()),
    ];

    let mut ids = Vec::with_capacity(songs.len());
    for (title, group, release_date, text) in songs {
        ids.push(store.insert_song(&NewSong {
            title: title.to_string(),
            group: group.to_string(),
            release_date: date(release_date)?,
            text,
            link: format!("https://example.com/{}", title.to_lowercase().replace(' ', "-")),
        })?);
    }

    Ok((dir, store, ids))
}
