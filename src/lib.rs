//! movies_api - a JSON movie catalog with versioned persistence.
//!
//! - [`runtime`]: the `"<n> mins"` wire codec for movie runtimes.
//! - [`validator`]: an accumulating, entity-agnostic validator.
//! - [`movie`]: the `Movie` entity and its rule set.
//! - [`store`]: the `MovieStore` capability with in-memory and SQLite backends.
//! - [`http`]: the axum transport (feature `http`).

pub mod config;
pub mod movie;
pub mod runtime;
pub mod store;
pub mod validator;

#[cfg(feature = "http")]
pub mod http;

pub use config::{Config, Environment, StoreKind};
pub use movie::{validate_movie, CreateMovie, Movie, MoviePatch};
pub use runtime::{Runtime, RuntimeFormatError};
#[cfg(feature = "sqlite")]
pub use store::SqliteMovieStore;
pub use store::{InMemoryMovieStore, Models, MovieStore, StoreError};
pub use validator::{ValidationErrors, Validator};
