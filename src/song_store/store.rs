//! SQLite-backed song store.

use super::models::{NewSong, PageWindow, QueryArg, Song, SongQuery};
use super::schema::SONGS_VERSIONED_SCHEMAS;
use super::trait_def::SongStore;
use crate::sqlite_persistence::bootstrap_schema;
use anyhow::{anyhow, Context, Result};
use rusqlite::types::ToSqlOutput;
use rusqlite::{params, params_from_iter, Connection, OpenFlags, Row, ToSql};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

const SONG_COLUMNS: &str = "id, title, group_name, release_date, text, link";

/// SQLite-backed song store.
///
/// Writes go through a single connection behind a mutex, reads are spread
/// round-robin over a small pool of read-only connections.
#[derive(Clone)]
pub struct SqliteSongStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

impl ToSql for QueryArg {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            QueryArg::Text(value) => value.to_sql(),
            QueryArg::Date(value) => value.to_sql(),
            QueryArg::Integer(value) => value.to_sql(),
        }
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| anyhow!("Song database connection mutex poisoned"))
}

fn row_to_song(row: &Row) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(0)?,
        title: row.get(1)?,
        group: row.get(2)?,
        release_date: row.get(3)?,
        text: row.get(4)?,
        link: row.get(5)?,
    })
}

impl SqliteSongStore {
    /// Open (or create) the song database at `db_path`.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of read-only connections, at least one is opened
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let write_conn = Connection::open_with_flags(
            db_path_ref,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open song database {:?}", db_path_ref))?;

        bootstrap_schema(&write_conn, SONGS_VERSIONED_SCHEMAS)
            .context("Failed to bootstrap song database schema")?;
        write_conn.pragma_update(None, "journal_mode", "WAL")?;

        let song_count: i64 = write_conn.query_row("SELECT COUNT(*) FROM songs", [], |r| r.get(0))?;
        info!("Opened song library at {:?}: {} songs", db_path_ref, song_count);

        let read_pool_size = read_pool_size.max(1);
        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path_ref,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteSongStore {
            read_pool,
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }
}

impl SongStore for SqliteSongStore {
    fn list_songs(&self, window: PageWindow) -> Result<Vec<Song>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM songs ORDER BY id LIMIT ?1 OFFSET ?2",
            SONG_COLUMNS
        ))?;
        let songs = stmt
            .query_map(params![window.limit, window.offset], row_to_song)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(songs)
    }

    fn list_songs_by_query(&self, query: &SongQuery) -> Result<Vec<Song>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let mut stmt = conn
            .prepare_cached(&query.sql)
            .with_context(|| format!("Failed to prepare listing query: {}", query.sql))?;
        let songs = stmt
            .query_map(params_from_iter(query.args.iter()), row_to_song)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(songs)
    }

    fn get_song_text(&self, id: i64) -> Result<Option<String>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        match conn.query_row("SELECT text FROM songs WHERE id = ?1", params![id], |r| {
            r.get(0)
        }) {
            Ok(text) => Ok(Some(text)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_song(&self, id: i64) -> Result<Option<Song>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        match conn.query_row(
            &format!("SELECT {} FROM songs WHERE id = ?1", SONG_COLUMNS),
            params![id],
            row_to_song,
        ) {
            Ok(song) => Ok(Some(song)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn count_songs(&self) -> Result<usize> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM songs", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    fn insert_song(&self, song: &NewSong) -> Result<i64> {
        let conn = lock(&self.write_conn)?;
        conn.execute(
            "INSERT INTO songs (title, group_name, release_date, text, link) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![song.title, song.group, song.release_date, song.text, song.link],
        )
        .context("Failed to insert song")?;
        Ok(conn.last_insert_rowid())
    }

    fn update_song(&self, id: i64, song: &NewSong) -> Result<()> {
        let conn = lock(&self.write_conn)?;
        conn.execute(
            "UPDATE songs SET title = ?1, group_name = ?2, release_date = ?3, text = ?4, link = ?5 WHERE id = ?6",
            params![song.title, song.group, song.release_date, song.text, song.link, id],
        )
        .with_context(|| format!("Failed to update song {}", id))?;
        Ok(())
    }

    fn delete_song(&self, id: i64) -> Result<()> {
        let conn = lock(&self.write_conn)?;
        conn.execute("DELETE FROM songs WHERE id = ?1", params![id])
            .with_context(|| format!("Failed to delete song {}", id))?;
        Ok(())
    }
}
