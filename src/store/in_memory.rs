//! InMemoryMovieStore - HashMap-backed movie store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::{debug, warn};

use super::{MovieStore, StoreError};
use crate::movie::Movie;

#[derive(Default)]
struct State {
    movies: HashMap<i64, Movie>,
    last_id: i64,
}

/// In-memory movie store. Clone-friendly via Arc; clones share storage.
#[derive(Clone, Default)]
pub struct InMemoryMovieStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryMovieStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored movies.
    pub fn len(&self) -> Result<usize, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.movies.len())
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned() -> StoreError {
    StoreError::Persistence("lock poisoned".into())
}

impl MovieStore for InMemoryMovieStore {
    fn insert(&self, movie: &mut Movie) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        state.last_id += 1;
        movie.id = state.last_id;
        movie.created_at = Some(Utc::now());
        movie.version = 1;
        state.movies.insert(movie.id, movie.clone());

        debug!(id = movie.id, "inserted movie");
        Ok(())
    }

    fn get(&self, id: i64) -> Result<Movie, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        state.movies.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn update(&self, movie: &mut Movie) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        let stored = state
            .movies
            .get_mut(&movie.id)
            .ok_or(StoreError::NotFound(movie.id))?;

        if stored.version != movie.version {
            warn!(
                id = movie.id,
                expected = movie.version,
                actual = stored.version,
                "edit conflict"
            );
            return Err(StoreError::EditConflict {
                id: movie.id,
                expected: movie.version,
                actual: stored.version,
            });
        }

        let new_version = stored.version + 1;
        stored.title = movie.title.clone();
        stored.year = movie.year;
        stored.runtime = movie.runtime;
        stored.genres = movie.genres.clone();
        stored.version = new_version;

        movie.version = new_version;
        movie.created_at = stored.created_at;

        debug!(id = movie.id, version = new_version, "updated movie");
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.movies.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }

        debug!(id, "deleted movie");
        Ok(())
    }
}
