//! Store - versioned persistence for movies.
//!
//! [`MovieStore`] is the capability every backend implements. Updates use
//! optimistic concurrency: the caller hands back the `version` it last saw,
//! and the write only lands if the stored record is still at that version.
//! The compare and the increment happen as one step, so of two callers racing
//! on the same version exactly one wins and the other gets
//! [`StoreError::EditConflict`].
//!
//! ## Example
//!
//! ```ignore
//! use movies_api::store::{Models, MovieStore};
//!
//! let models = Models::in_memory();
//! models.movies.insert(&mut movie)?;
//! assert_eq!(movie.version, 1);
//!
//! movie.title = "Casablanca (Restored)".into();
//! models.movies.update(&mut movie)?;
//! assert_eq!(movie.version, 2);
//! ```

mod in_memory;
#[cfg(feature = "sqlite")]
mod sqlite;

use std::sync::Arc;

use thiserror::Error;

use crate::movie::Movie;

pub use in_memory::InMemoryMovieStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteMovieStore;

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record under this id.
    #[error("record not found: {0}")]
    NotFound(i64),
    /// The stored version moved on since the caller read it.
    #[error("edit conflict on record {id} (expected version {expected}, actual {actual})")]
    EditConflict { id: i64, expected: i32, actual: i32 },
    /// Opaque storage fault.
    #[error("persistence error: {0}")]
    Persistence(String),
}

/// CRUD over movies with version-checked updates.
pub trait MovieStore: Send + Sync {
    /// Persist a new movie. Assigns `id`, `created_at` and `version = 1`
    /// on the caller's value.
    fn insert(&self, movie: &mut Movie) -> Result<(), StoreError>;

    /// Fetch the movie stored under `id`.
    fn get(&self, id: i64) -> Result<Movie, StoreError>;

    /// Write the caller's field values if the stored version still equals
    /// `movie.version`, then bump the version by one on both sides. The
    /// stored `created_at` is copied back into the caller's value.
    fn update(&self, movie: &mut Movie) -> Result<(), StoreError>;

    /// Remove the movie stored under `id`.
    fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// The set of stores a running process uses, chosen once at startup.
#[derive(Clone)]
pub struct Models {
    pub movies: Arc<dyn MovieStore>,
}

impl Models {
    /// Wrap an arbitrary movie store.
    pub fn new(movies: impl MovieStore + 'static) -> Self {
        Self {
            movies: Arc::new(movies),
        }
    }

    /// Models backed by an in-memory store.
    pub fn in_memory() -> Self {
        Self::new(InMemoryMovieStore::new())
    }

    /// Models backed by a SQLite database file.
    #[cfg(feature = "sqlite")]
    pub fn sqlite(path: impl AsRef<std::path::Path>) -> Result<Self, StoreError> {
        Ok(Self::new(SqliteMovieStore::open(path)?))
    }
}

impl std::fmt::Debug for Models {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Models").finish_non_exhaustive()
    }
}
