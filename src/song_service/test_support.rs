//! In-memory collaborators for service tests.

use super::lookup::{SongDetails, SongDetailsLookup};
use crate::song_store::{NewSong, PageWindow, Song, SongQuery, SongStore};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct InMemorySongStore {
    songs: Mutex<Vec<Song>>,
    queries: Mutex<Vec<SongQuery>>,
    pub fail_writes: AtomicBool,
}

impl InMemorySongStore {
    pub fn songs(&self) -> Vec<Song> {
        self.songs.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<SongQuery> {
        self.queries.lock().unwrap().clone()
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("store is read-only");
        }
        Ok(())
    }
}

impl SongStore for InMemorySongStore {
    fn list_songs(&self, window: PageWindow) -> Result<Vec<Song>> {
        Ok(self
            .songs
            .lock()
            .unwrap()
            .iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .cloned()
            .collect())
    }

    /// Records the query; filtering semantics are covered against SQLite.
    fn list_songs_by_query(&self, query: &SongQuery) -> Result<Vec<Song>> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(vec![])
    }

    fn get_song_text(&self, id: i64) -> Result<Option<String>> {
        Ok(self.get_song(id)?.map(|song| song.text))
    }

    fn get_song(&self, id: i64) -> Result<Option<Song>> {
        Ok(self
            .songs
            .lock()
            .unwrap()
            .iter()
            .find(|song| song.id == id)
            .cloned())
    }

    fn count_songs(&self) -> Result<usize> {
        Ok(self.songs.lock().unwrap().len())
    }

    fn insert_song(&self, song: &NewSong) -> Result<i64> {
        self.check_writable()?;
        let mut songs = self.songs.lock().unwrap();
        let id = songs.last().map_or(1, |last| last.id + 1);
        songs.push(song.clone().with_id(id));
        Ok(id)
    }

    fn update_song(&self, id: i64, song: &NewSong) -> Result<()> {
        self.check_writable()?;
        let mut songs = self.songs.lock().unwrap();
        if let Some(existing) = songs.iter_mut().find(|existing| existing.id == id) {
            *existing = song.clone().with_id(id);
        }
        Ok(())
    }

    fn delete_song(&self, id: i64) -> Result<()> {
        self.check_writable()?;
        self.songs.lock().unwrap().retain(|song| song.id != id);
        Ok(())
    }
}

/// Lookup answering with fixed details after an optional delay.
pub struct FakeLookup {
    pub response: Result<SongDetails, String>,
    pub delay: Duration,
    pub completed: AtomicUsize,
}

impl FakeLookup {
    pub fn answering(details: SongDetails) -> Self {
        FakeLookup {
            response: Ok(details),
            delay: Duration::ZERO,
            completed: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        FakeLookup {
            response: Err(message.to_string()),
            delay: Duration::ZERO,
            completed: AtomicUsize::new(0),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl SongDetailsLookup for FakeLookup {
    async fn fetch_details(&self, _group: &str, _song: &str) -> Result<SongDetails> {
        tokio::time::sleep(self.delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(details) => Ok(details.clone()),
            Err(message) => bail!("{}", message),
        }
    }
}

pub fn muse_details() -> SongDetails {
    SongDetails {
        release_date: "16.07.2006".to_string(),
        text: "Ooh baby, don't you know I suffer?\n\nOoh baby, can you hear me moan?"
            .to_string(),
        link: "https://www.youtube.com/watch?v=Xsp3_a-PMTw".to_string(),
    }
}
