use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

/// Failure of a single relayed request. Rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No file provided")]
    MissingFile,
    /// Body could not be read or parsed as a form.
    #[error("{0}")]
    InvalidForm(String),
    /// Backend answered with a non-success status.
    #[error("{0}")]
    Backend(String),
    #[error("{0}")]
    Transport(String),
    /// Backend body was not JSON.
    #[error("{0}")]
    Decode(String),
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingFile => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
