//! Error responses.
//!
//! Domain errors never reach this point: they are carried inside a 200
//! response body. Only endpoint failures (wiring mistakes) map to an HTTP
//! error status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::endpoint::EndpointError;

/// Endpoint failure rendered as `500 {"error": "..."}`.
#[derive(Debug)]
pub struct HttpError(pub EndpointError);

impl From<EndpointError> for HttpError {
    fn from(e: EndpointError) -> Self {
        Self(e)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Endpoint failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
