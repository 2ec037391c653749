//! HTTP transport - exposes the movie store as a JSON API.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /v1/healthcheck` — `{ "status": "available", "system_info": {...} }`.
//! - `POST /v1/movies` — create; responds 201 with a `Location` header.
//! - `GET /v1/movies/:id` — fetch one movie.
//! - `PATCH /v1/movies/:id` — partial update with optimistic concurrency.
//!   An `X-Expected-Version` header, when present, must match the stored version.
//! - `DELETE /v1/movies/:id` — delete.
//!
//! Unsupported verbs on these paths get a JSON 405; unknown paths a JSON 404.
//!
//! ## Example
//!
//! ```ignore
//! use movies_api::{http, store::Models, Config};
//!
//! let config = Config::default();
//! let app = http::router(http::AppState::new(Models::in_memory(), &config), &config);
//!
//! // Or serve directly
//! http::serve(Models::in_memory(), &config).await?;
//! ```

mod error;
mod handlers;
mod json;

use axum::extract::{DefaultBodyLimit, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::config::{Config, Environment};
use crate::store::Models;

pub use error::ApiError;
pub use handlers::EXPECTED_VERSION_HEADER;
pub use json::read_json;

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub models: Models,
    pub environment: Environment,
}

impl AppState {
    pub fn new(models: Models, config: &Config) -> Self {
        Self {
            models,
            environment: config.env,
        }
    }
}

/// Build the axum `Router` for the API.
pub fn router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route(
            "/v1/healthcheck",
            get(handlers::healthcheck).fallback(handlers::method_not_allowed),
        )
        .route(
            "/v1/movies",
            post(handlers::create_movie).fallback(handlers::method_not_allowed),
        )
        .route(
            "/v1/movies/:id",
            get(handlers::show_movie)
                .patch(handlers::update_movie)
                .delete(handlers::delete_movie)
                .fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Serve the API on `config.addr()` until ctrl-c.
pub async fn serve(models: Models, config: &Config) -> Result<(), std::io::Error> {
    let app = router(AppState::new(models, config), config);
    let listener = tokio::net::TcpListener::bind(config.addr()).await?;

    info!(addr = %listener.local_addr()?, env = %config.env, "starting server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    info!(%method, %path, status = response.status().as_u16(), "request");
    response
}
