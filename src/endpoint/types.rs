//! Request and response shapes for the two string operations.
//!
//! These are both the in-process endpoint values and the JSON wire format:
//! `{"s": "..."}` in, `{"v": "...", "err": "..."}` or `{"v": n}` out.

use serde::{Deserialize, Serialize};

/// Input for the uppercase operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UppercaseRequest {
    pub s: String,
}

/// Output of the uppercase operation.
///
/// A domain failure travels in `err` rather than as a transport error, so
/// callers always get a well-formed envelope. On the wire an absent error is
/// the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UppercaseResponse {
    pub v: String,
    #[serde(default, with = "empty_as_none")]
    pub err: Option<String>,
}

/// Input for the count operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRequest {
    pub s: String,
}

/// Output of the count operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub v: usize,
}

/// Request value accepted by an [`Endpoint`](super::Endpoint).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Uppercase(UppercaseRequest),
    Count(CountRequest),
}

impl Request {
    /// Operation name, used in logs and mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Request::Uppercase(_) => "uppercase",
            Request::Count(_) => "count",
        }
    }
}

/// Response value produced by an [`Endpoint`](super::Endpoint).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Uppercase(UppercaseResponse),
    Count(CountResponse),
}

impl Response {
    pub fn kind(&self) -> &'static str {
        match self {
            Response::Uppercase(_) => "uppercase",
            Response::Count(_) => "count",
        }
    }
}

mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()))
    }
}
