//! HTTP transport integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

use movies_api::http::{self, AppState, EXPECTED_VERSION_HEADER};
use movies_api::{Config, Models};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Bind to port 0 and return the actual address.
async fn start_server(config: Config) -> String {
    let state = AppState::new(Models::in_memory(), &config);
    let app = http::router(state, &config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn casablanca() -> Value {
    json!({
        "title": "Casablanca",
        "year": 1942,
        "runtime": "102 mins",
        "genres": ["drama", "romance", "war"]
    })
}

async fn create(client: &reqwest::Client, base: &str, body: &Value) -> Value {
    let resp = client
        .post(format!("{base}/v1/movies"))
        .json(body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    body["movie"].clone()
}

#[tokio::test]
async fn healthcheck() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/v1/healthcheck"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "available");
    assert_eq!(body["system_info"]["environment"], "development");
}

#[tokio::test]
async fn create_returns_201_with_location() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/v1/movies"))
        .json(&casablanca())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers()["location"], "/v1/movies/1");

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "movie": {
                "id": 1,
                "title": "Casablanca",
                "year": 1942,
                "runtime": "102 mins",
                "genres": ["drama", "romance", "war"],
                "version": 1
            }
        })
    );
}

#[tokio::test]
async fn create_and_show() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    let created = create(&client, &base, &casablanca()).await;
    let id = created["id"].as_i64().unwrap();

    let resp = client
        .get(format!("{base}/v1/movies/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["movie"], created);
    assert!(body["movie"].get("created_at").is_none());
}

#[tokio::test]
async fn create_reports_every_invalid_field() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/v1/movies"))
        .json(&json!({ "title": "", "genres": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.unwrap();
    let errors = body["error"].as_object().unwrap();
    assert_eq!(errors.len(), 4);
    for field in ["title", "year", "runtime", "genres"] {
        assert!(errors.contains_key(field), "missing {field}");
    }
}

#[tokio::test]
async fn null_fields_are_validation_errors() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/v1/movies"))
        .json(&json!({ "title": null, "year": null, "runtime": null, "genres": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["title"], "must be provided");
    assert_eq!(body["error"]["year"], "must be provided");
    assert_eq!(body["error"]["runtime"], "must be provided");
    assert_eq!(body["error"]["genres"], "must contain at least 1 genre");
}

#[tokio::test]
async fn negative_runtime_is_a_validation_error() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    let mut body = casablanca();
    body["runtime"] = json!("-5 mins");

    let resp = client
        .post(format!("{base}/v1/movies"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["runtime"], "must be a positive integer");
}

#[tokio::test]
async fn malformed_runtime_is_a_bad_request() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    for runtime in [json!("102mins"), json!("abc mins"), json!("102 minutes"), json!(102)] {
        let mut body = casablanca();
        body["runtime"] = runtime.clone();

        let resp = client
            .post(format!("{base}/v1/movies"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{runtime}");
    }
}

#[tokio::test]
async fn unknown_key_is_a_bad_request() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    let mut body = casablanca();
    body["rating"] = json!("PG");

    let resp = client
        .post(format!("{base}/v1/movies"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "body contains unknown key \"rating\"");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let config = Config {
        max_body_bytes: 64,
        ..Config::default()
    };
    let base = start_server(config).await;
    let client = reqwest::Client::new();

    let mut body = casablanca();
    body["title"] = json!("x".repeat(200));

    let resp = client
        .post(format!("{base}/v1/movies"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn show_missing_or_invalid_id_returns_404() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    for id in ["1", "0", "-1", "abc"] {
        let resp = client
            .get(format!("{base}/v1/movies/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{id}");
    }
}

#[tokio::test]
async fn patch_updates_fields_and_bumps_version() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    let created = create(&client, &base, &casablanca()).await;
    let id = created["id"].as_i64().unwrap();

    let resp = client
        .patch(format!("{base}/v1/movies/{id}"))
        .json(&json!({ "runtime": "103 mins" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["movie"]["runtime"], "103 mins");
    assert_eq!(body["movie"]["title"], "Casablanca");
    assert_eq!(body["movie"]["version"], 2);
}

#[tokio::test]
async fn patch_with_invalid_values_is_rejected() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    let created = create(&client, &base, &casablanca()).await;
    let id = created["id"].as_i64().unwrap();

    let resp = client
        .patch(format!("{base}/v1/movies/{id}"))
        .json(&json!({ "genres": ["drama", "drama"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = client
        .get(format!("{base}/v1/movies/{id}"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["movie"]["version"], 1);
}

#[tokio::test]
async fn patch_with_stale_expected_version_conflicts() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    let created = create(&client, &base, &casablanca()).await;
    let id = created["id"].as_i64().unwrap();

    let resp = client
        .patch(format!("{base}/v1/movies/{id}"))
        .header(EXPECTED_VERSION_HEADER, "1")
        .json(&json!({ "year": 1943 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .patch(format!("{base}/v1/movies/{id}"))
        .header(EXPECTED_VERSION_HEADER, "1")
        .json(&json!({ "year": 1944 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["error"],
        "unable to update the record due to an edit conflict, please try again"
    );
}

#[tokio::test]
async fn patch_missing_returns_404() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .patch(format!("{base}/v1/movies/42"))
        .json(&json!({ "year": 1943 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_delete_again() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    let created = create(&client, &base, &casablanca()).await;
    let id = created["id"].as_i64().unwrap();

    let resp = client
        .delete(format!("{base}/v1/movies/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "movie successfully deleted");

    let resp = client
        .delete(format!("{base}/v1/movies/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/v2/nope")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "the requested resource could not be found");
}

#[tokio::test]
async fn wrong_method_returns_405() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{base}/v1/movies/1"))
        .json(&casablanca())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["error"],
        "the PUT method is not supported for this resource"
    );
}

#[tokio::test]
async fn wrong_method_on_collection_and_healthcheck_returns_json_405() {
    let base = start_server(Config::default()).await;
    let client = reqwest::Client::new();

    for (method, path) in [
        (reqwest::Method::DELETE, "/v1/movies"),
        (reqwest::Method::POST, "/v1/healthcheck"),
    ] {
        let resp = client
            .request(method.clone(), format!("{base}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{method} {path}");

        let body: Value = resp.json().await.unwrap();
        assert_eq!(
            body["error"],
            format!("the {method} method is not supported for this resource")
        );
    }
}
