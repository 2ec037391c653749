//! Route handlers for `/v1/healthcheck` and `/v1/movies`.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use super::error::ApiError;
use super::json::read_json;
use super::AppState;
use crate::movie::{validate_movie, CreateMovie, Movie, MoviePatch};
use crate::validator::Validator;

/// Optional request header carrying the version the client last saw.
pub const EXPECTED_VERSION_HEADER: &str = "x-expected-version";

/// `GET /v1/healthcheck`
pub(crate) async fn healthcheck(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "available",
        "system_info": {
            "environment": state.environment.as_str(),
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}

/// `POST /v1/movies`
pub(crate) async fn create_movie(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input: CreateMovie = read_json(&body?)?;
    let mut movie = Movie::from(input);
    ensure_valid(&movie)?;

    state.models.movies.insert(&mut movie)?;

    let location = format!("/v1/movies/{}", movie.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(json!({ "movie": movie })),
    ))
}

/// `GET /v1/movies/:id`
pub(crate) async fn show_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let movie = state.models.movies.get(id)?;
    Ok(Json(json!({ "movie": movie })))
}

/// `PATCH /v1/movies/:id`
pub(crate) async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let mut movie = state.models.movies.get(id)?;

    if let Some(expected) = headers.get(EXPECTED_VERSION_HEADER) {
        if expected.to_str().ok() != Some(movie.version.to_string().as_str()) {
            return Err(ApiError::EditConflict);
        }
    }

    let patch: MoviePatch = read_json(&body?)?;
    patch.apply(&mut movie);
    ensure_valid(&movie)?;

    state.models.movies.update(&mut movie)?;
    Ok(Json(json!({ "movie": movie })))
}

/// `DELETE /v1/movies/:id`
pub(crate) async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    state.models.movies.delete(id)?;
    Ok(Json(json!({ "message": "movie successfully deleted" })))
}

/// Fallback for unmatched routes.
pub(crate) async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Fallback for known routes hit with an unsupported verb.
pub(crate) async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method.to_string())
}

fn ensure_valid(movie: &Movie) -> Result<(), ApiError> {
    let mut v = Validator::new();
    validate_movie(&mut v, movie);
    if v.is_valid() {
        Ok(())
    } else {
        Err(ApiError::FailedValidation(v.into_errors()))
    }
}

/// Ids are positive integers; anything else cannot name a record.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(ApiError::NotFound),
    }
}
