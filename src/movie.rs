//! Movie - the catalog entity, its request inputs, and its validation rules.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::runtime::Runtime;
use crate::validator::{self, Validator};

/// Earliest year a film could plausibly have been released.
pub const MIN_YEAR: i32 = 1888;

/// Upper bound on the title length, in bytes.
pub const MAX_TITLE_BYTES: usize = 500;

/// Upper bound on the number of genres.
pub const MAX_GENRES: usize = 5;

/// One catalog item.
///
/// `id`, `created_at` and `version` are owned by the store: they are zero /
/// `None` until [`MovieStore::insert`](crate::store::MovieStore::insert)
/// fills them in. `created_at` never appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Movie {
    pub id: i64,
    #[serde(skip)]
    pub created_at: Option<DateTime<Utc>>,
    pub title: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub year: i32,
    #[serde(skip_serializing_if = "Runtime::is_zero")]
    pub runtime: Runtime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    pub version: i32,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// Body of a create request.
///
/// Absent and `null` fields both become the zero value, so they are reported
/// by validation rather than rejected while decoding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMovie {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<Runtime>,
    pub genres: Option<Vec<String>>,
}

impl From<CreateMovie> for Movie {
    fn from(input: CreateMovie) -> Self {
        Movie {
            title: input.title.unwrap_or_default(),
            year: input.year.unwrap_or_default(),
            runtime: input.runtime.unwrap_or_default(),
            genres: input.genres.unwrap_or_default(),
            ..Movie::default()
        }
    }
}

/// Body of a partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<Runtime>,
    pub genres: Option<Vec<String>>,
}

impl MoviePatch {
    /// Overwrite the fields present in the patch.
    pub fn apply(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(runtime) = self.runtime {
            movie.runtime = runtime;
        }
        if let Some(genres) = self.genres {
            movie.genres = genres;
        }
    }
}

/// Run every movie rule against `movie`, recording failures in `v`.
pub fn validate_movie(v: &mut Validator, movie: &Movie) {
    validate_movie_in_year(v, movie, Utc::now().year());
}

/// Same as [`validate_movie`] with an explicit "current" year.
pub fn validate_movie_in_year(v: &mut Validator, movie: &Movie, current_year: i32) {
    v.check(!movie.title.is_empty(), "title", "must be provided");
    v.check(
        movie.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(movie.year != 0, "year", "must be provided");
    v.check(movie.year >= MIN_YEAR, "year", "must be greater than 1888");
    v.check(movie.year <= current_year, "year", "must not be in the future");

    v.check(!movie.runtime.is_zero(), "runtime", "must be provided");
    v.check(movie.runtime.minutes() > 0, "runtime", "must be a positive integer");

    v.check(!movie.genres.is_empty(), "genres", "must contain at least 1 genre");
    v.check(
        movie.genres.len() <= MAX_GENRES,
        "genres",
        "must not contain more than 5 genres",
    );
    v.check(
        validator::unique(&movie.genres),
        "genres",
        "must not contain duplicate values",
    );
}
