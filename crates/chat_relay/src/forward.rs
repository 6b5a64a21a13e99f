use bytes::Bytes;
use chat_engine::endpoint_url;
use chat_logging::chat_debug;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use url::Url;

use crate::RelayError;

/// Used when the backend fails without saying why.
const BACKEND_ERROR_FALLBACK: &str = "Backend error";

/// Forwards request bodies to the backend and translates its answer.
///
/// One `reqwest::Client` is shared by all requests. No retries, no timeout.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    backend_url: Url,
}

impl Forwarder {
    pub fn new(backend_url: Url) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| RelayError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            backend_url,
        })
    }

    /// POSTs `body` unmodified, keeping the caller's content type.
    pub async fn post(
        &self,
        route: &str,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<Value, RelayError> {
        let url = endpoint_url(&self.backend_url, route)?;
        chat_debug!("Forwarding {} bytes to {}", body.len(), url);
        let mut request = self.client.post(url).body(body);
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }
        self.relay(request).await
    }

    pub async fn get(&self, route: &str) -> Result<Value, RelayError> {
        let url = endpoint_url(&self.backend_url, route)?;
        chat_debug!("Forwarding GET to {}", url);
        self.relay(self.client.get(url)).await
    }

    async fn relay(&self, request: reqwest::RequestBuilder) -> Result<Value, RelayError> {
        let response = request
            .send()
            .await
            .map_err(|err| RelayError::Transport(err.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| RelayError::Transport(err.to_string()))?;
        // Decoded before the status check: a failing backend still answers in JSON.
        let data: Value =
            serde_json::from_slice(&bytes).map_err(|err| RelayError::Decode(err.to_string()))?;

        if !status.is_success() {
            return Err(RelayError::Backend(backend_detail(&data)));
        }
        Ok(data)
    }
}

fn backend_detail(data: &Value) -> String {
    match data.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(Value::Null) | Some(Value::String(_)) | None => BACKEND_ERROR_FALLBACK.to_string(),
        Some(other) => other.to_string(),
    }
}
