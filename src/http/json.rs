//! Strict JSON body decoding.

use serde::de::DeserializeOwned;
use serde_json::error::Category;

use super::error::ApiError;

/// Decode exactly one JSON value from `body` into `T`.
///
/// Rejects empty bodies, malformed JSON, unknown keys (for inputs marked
/// `deny_unknown_fields`), wrong types and trailing data.
pub fn read_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest("body must not be empty".into()));
    }

    let mut de = serde_json::Deserializer::from_slice(body);
    let value = T::deserialize(&mut de).map_err(describe)?;
    de.end().map_err(|_| {
        ApiError::BadRequest("body must only contain a single JSON value".into())
    })?;

    Ok(value)
}

fn describe(err: serde_json::Error) -> ApiError {
    let message = match err.classify() {
        Category::Syntax => format!(
            "body contains badly-formed JSON (at line {}, column {})",
            err.line(),
            err.column()
        ),
        Category::Eof => "body contains badly-formed JSON".to_string(),
        Category::Data => match unknown_field(&err.to_string()) {
            Some(field) => format!("body contains unknown key \"{}\"", field),
            None => err.to_string(),
        },
        Category::Io => err.to_string(),
    };
    ApiError::BadRequest(message)
}

/// Pull the field name out of serde's "unknown field `x`, expected ..." message.
fn unknown_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("unknown field `")?;
    rest.split('`').next()
}
