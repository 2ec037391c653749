//! Runtime - a movie duration in minutes with a human-readable wire form.
//!
//! Internally a runtime is a plain `i32`. On the wire it is a JSON string of
//! the exact shape `"<minutes> mins"`, e.g. `"102 mins"`.
//!
//! The codec only checks *format*. Whether a runtime is acceptable (non-zero,
//! positive) is decided by the movie rule set in [`crate::movie`].
//!
//! ## Example
//!
//! ```
//! use movies_api::runtime::{self, Runtime};
//!
//! assert_eq!(runtime::encode(Runtime(102)), "\"102 mins\"");
//! assert_eq!(runtime::decode("\"102 mins\"").unwrap(), Runtime(102));
//! ```

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Unit suffix that follows the number in the wire form.
const SUFFIX: &str = "mins";

/// Returned when a value does not match the `"<minutes> mins"` grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeFormatError {
    #[error("invalid runtime format")]
    InvalidFormat,
}

/// Movie runtime in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Runtime(pub i32);

impl Runtime {
    /// Number of minutes.
    pub fn minutes(self) -> i32 {
        self.0
    }

    /// True for the zero value, which the movie wire form omits.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<i32> for Runtime {
    fn from(minutes: i32) -> Self {
        Runtime(minutes)
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, SUFFIX)
    }
}

/// Encode a runtime into its quoted wire form. Never fails.
///
/// Negative values are encoded as-is; rejecting them is a validation concern.
pub fn encode(runtime: Runtime) -> String {
    format!("\"{}\"", runtime)
}

/// Decode a quoted wire string such as `"102 mins"`.
pub fn decode(wire: &str) -> Result<Runtime, RuntimeFormatError> {
    let unquoted = unquote(wire)?;
    parse_unquoted(&unquoted)
}

/// Strip exactly one layer of JSON string quoting.
fn unquote(wire: &str) -> Result<String, RuntimeFormatError> {
    if wire.len() < 2 || !wire.starts_with('"') || !wire.ends_with('"') {
        return Err(RuntimeFormatError::InvalidFormat);
    }
    serde_json::from_str::<String>(wire).map_err(|_| RuntimeFormatError::InvalidFormat)
}

/// Parse the unquoted content, e.g. `102 mins`.
fn parse_unquoted(content: &str) -> Result<Runtime, RuntimeFormatError> {
    let parts: Vec<&str> = content.split(' ').collect();
    if parts.len() != 2 || parts[1] != SUFFIX {
        return Err(RuntimeFormatError::InvalidFormat);
    }

    parts[0]
        .parse::<i32>()
        .map(Runtime)
        .map_err(|_| RuntimeFormatError::InvalidFormat)
}

impl Serialize for Runtime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(RuntimeVisitor)
    }
}

struct RuntimeVisitor;

impl Visitor<'_> for RuntimeVisitor {
    type Value = Runtime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string of the form \"<minutes> mins\"")
    }

    // The deserializer has already removed the JSON quoting.
    fn visit_str<E: de::Error>(self, value: &str) -> Result<Runtime, E> {
        parse_unquoted(value).map_err(E::custom)
    }
}
