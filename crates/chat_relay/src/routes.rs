use std::sync::Arc;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    response::Json,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use chat_logging::chat_error;
use serde_json::Value;

use crate::{Forwarder, RelayError};

pub const CHAT_ROUTE: &str = "/api/proxy/chat";
pub const UPLOAD_ROUTE: &str = "/api/proxy/upload";
pub const INFO_ROUTE: &str = "/api/proxy/info";

const FILE_FIELD: &str = "file";

/// Application state shared across routes
#[derive(Clone)]
pub struct RelayState {
    pub forwarder: Arc<Forwarder>,
}

/// Create router with all relay routes
pub fn create_router(state: RelayState) -> Router {
    Router::new()
        .route(CHAT_ROUTE, post(proxy_chat))
        .route(UPLOAD_ROUTE, post(proxy_upload))
        .route(INFO_ROUTE, get(proxy_info))
        // Size checks belong to the backend.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// POST /api/proxy/upload - forward a multipart form carrying `file`
async fn proxy_upload(
    State(state): State<RelayState>,
    request: Request,
) -> Result<Json<Value>, RelayError> {
    let (parts, body) = request.into_parts();
    let content_type = content_type(&parts.headers);

    let result = async {
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|err| RelayError::InvalidForm(err.to_string()))?;
        let probe = Request::from_parts(parts, Body::from(body.clone()));
        if !form_has_field(probe, FILE_FIELD).await? {
            return Err(RelayError::MissingFile);
        }
        state
            .forwarder
            .post("upload", content_type.as_deref(), body)
            .await
    }
    .await;

    result.map(Json).inspect_err(|err| log_failure(UPLOAD_ROUTE, err))
}

/// POST /api/proxy/chat - forward the JSON chat message
async fn proxy_chat(
    State(state): State<RelayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, RelayError> {
    state
        .forwarder
        .post("chat", content_type(&headers).as_deref(), body)
        .await
        .map(Json)
        .inspect_err(|err| log_failure(CHAT_ROUTE, err))
}

/// GET /api/proxy/info - backend greeting
async fn proxy_info(State(state): State<RelayState>) -> Result<Json<Value>, RelayError> {
    state
        .forwarder
        .get("")
        .await
        .map(Json)
        .inspect_err(|err| log_failure(INFO_ROUTE, err))
}

fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Parses the form only far enough to find a non-empty field called `name`.
///
/// A file part counts even when empty; a plain text part must carry a value.
async fn form_has_field(request: Request, name: &str) -> Result<bool, RelayError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|rejection| RelayError::InvalidForm(rejection.to_string()))?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| RelayError::InvalidForm(err.to_string()))?
    {
        if field.name() != Some(name) {
            continue;
        }
        if field.file_name().is_some() {
            return Ok(true);
        }
        let value = field
            .text()
            .await
            .map_err(|err| RelayError::InvalidForm(err.to_string()))?;
        // Only the first entry under `name` is considered.
        return Ok(!value.is_empty());
    }
    Ok(false)
}

fn log_failure(route: &str, err: &RelayError) {
    if err.status().is_server_error() {
        chat_error!("[relay {}] {}", route, err);
    }
}
