//! SqliteMovieStore - durable movie store backed by a SQLite database.
//!
//! Versioned updates are a single conditional statement
//! (`... WHERE id = ? AND version = ?`), so the compare-and-increment is atomic
//! in the database itself, not just within this process.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, error, warn};

use super::{MovieStore, StoreError};
use crate::movie::Movie;
use crate::runtime::Runtime;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS movies (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT    NOT NULL,
    title      TEXT    NOT NULL,
    year       INTEGER NOT NULL,
    runtime    INTEGER NOT NULL,
    genres     TEXT    NOT NULL,
    version    INTEGER NOT NULL DEFAULT 1
);
";

const SELECT_MOVIE: &str =
    "SELECT id, created_at, title, year, runtime, genres, version FROM movies WHERE id = ?1";

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        error!(error = %err, "sqlite error");
        StoreError::Persistence(err.to_string())
    }
}

/// SQLite-backed movie store. Clones share the same connection.
#[derive(Clone)]
pub struct SqliteMovieStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMovieStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Use an existing connection, creating the `movies` table if needed.
    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Persistence("connection lock poisoned".into()))
    }
}

fn encode_genres(genres: &[String]) -> Result<String, StoreError> {
    serde_json::to_string(genres).map_err(|e| StoreError::Persistence(e.to_string()))
}

fn movie_from_row(row: &Row<'_>) -> rusqlite::Result<Movie> {
    let genres: String = row.get(5)?;
    let genres: Vec<String> = serde_json::from_str(&genres)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    let created_at: DateTime<Utc> = row.get(1)?;

    Ok(Movie {
        id: row.get(0)?,
        created_at: Some(created_at),
        title: row.get(2)?,
        year: row.get(3)?,
        runtime: Runtime(row.get(4)?),
        genres,
        version: row.get(6)?,
    })
}

impl MovieStore for SqliteMovieStore {
    fn insert(&self, movie: &mut Movie) -> Result<(), StoreError> {
        let genres = encode_genres(&movie.genres)?;
        let created_at = Utc::now();
        let conn = self.lock()?;

        let (id, version): (i64, i32) = conn.query_row(
            "INSERT INTO movies (created_at, title, year, runtime, genres)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, version",
            params![
                created_at,
                movie.title,
                movie.year,
                movie.runtime.minutes(),
                genres
            ],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        movie.id = id;
        movie.created_at = Some(created_at);
        movie.version = version;

        debug!(id, "inserted movie");
        Ok(())
    }

    fn get(&self, id: i64) -> Result<Movie, StoreError> {
        let conn = self.lock()?;
        conn.query_row(SELECT_MOVIE, [id], movie_from_row)
            .optional()?
            .ok_or(StoreError::NotFound(id))
    }

    fn update(&self, movie: &mut Movie) -> Result<(), StoreError> {
        let genres = encode_genres(&movie.genres)?;
        let conn = self.lock()?;

        let updated: Option<(i32, DateTime<Utc>)> = conn
            .query_row(
                "UPDATE movies
                 SET title = ?1, year = ?2, runtime = ?3, genres = ?4, version = version + 1
                 WHERE id = ?5 AND version = ?6
                 RETURNING version, created_at",
                params![
                    movie.title,
                    movie.year,
                    movie.runtime.minutes(),
                    genres,
                    movie.id,
                    movie.version
                ],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        if let Some((version, created_at)) = updated {
            movie.version = version;
            movie.created_at = Some(created_at);
            debug!(id = movie.id, version, "updated movie");
            return Ok(());
        }

        // Nothing matched: either the row is gone or its version moved on.
        let actual: Option<i32> = conn
            .query_row("SELECT version FROM movies WHERE id = ?1", [movie.id], |row| {
                row.get(0)
            })
            .optional()?;

        match actual {
            None => Err(StoreError::NotFound(movie.id)),
            Some(actual) => {
                warn!(
                    id = movie.id,
                    expected = movie.version,
                    actual,
                    "edit conflict"
                );
                Err(StoreError::EditConflict {
                    id: movie.id,
                    expected: movie.version,
                    actual,
                })
            }
        }
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM movies WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }

        debug!(id, "deleted movie");
        Ok(())
    }
}
