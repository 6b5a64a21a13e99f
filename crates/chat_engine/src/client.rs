use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use chat_logging::{chat_debug, chat_info};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio_util::io::ReaderStream;
use url::Url;

use crate::types::ChatRequest;
use crate::{ChatReply, ClientError, FailureKind, RootInfo, UploadReceipt};

/// Timeouts are off unless configured; a hung backend keeps the request open.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

/// Paths of the three endpoints, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRoutes {
    pub chat: String,
    pub upload: String,
    pub info: String,
}

impl Default for ClientRoutes {
    /// Same-origin relay routes.
    fn default() -> Self {
        Self {
            chat: "api/proxy/chat".to_string(),
            upload: "api/proxy/upload".to_string(),
            info: "api/proxy/info".to_string(),
        }
    }
}

impl ClientRoutes {
    /// Routes of the document backend itself, for use without a relay.
    pub fn direct() -> Self {
        Self {
            chat: "chat".to_string(),
            upload: "upload".to_string(),
            info: String::new(),
        }
    }
}

/// Parses a base URL and makes sure relative joins stay below its path.
pub fn normalize_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

pub fn endpoint_url(base: &Url, route: &str) -> Result<Url, url::ParseError> {
    base.join(route.trim_start_matches('/'))
}

#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn chat(&self, message: &str) -> Result<ChatReply, ClientError>;

    async fn upload(&self, path: &Path, filename: &str) -> Result<UploadReceipt, ClientError>;

    async fn info(&self) -> Result<RootInfo, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
    routes: ClientRoutes,
}

impl HttpBackend {
    pub fn new(
        base_url: Url,
        routes: ClientRoutes,
        settings: &ClientSettings,
    ) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            routes,
        })
    }

    fn url_for(&self, route: &str) -> Result<Url, ClientError> {
        endpoint_url(&self.base_url, route)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn chat(&self, message: &str) -> Result<ChatReply, ClientError> {
        let url = self.url_for(&self.routes.chat)?;
        let body = serde_json::to_vec(&ChatRequest { message })
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))?;
        chat_debug!("POST {} message_len={}", url, message.len());

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn upload(&self, path: &Path, filename: &str) -> Result<UploadReceipt, ClientError> {
        let url = self.url_for(&self.routes.upload)?;
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|err| {
                ClientError::new(FailureKind::Io, format!("{}: {err}", path.display()))
            })?;
        let len = file
            .metadata()
            .await
            .map_err(|err| ClientError::new(FailureKind::Io, err.to_string()))?
            .len();
        chat_info!("Uploading {} ({} bytes) to {}", filename, len, url);

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let part = Part::stream_with_length(body, len).file_name(filename.to_string());
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: serde_json::Value = read_json(response).await?;
        let filename = body
            .get("filename")
            .and_then(|value| value.as_str())
            .map(str::to_owned);
        Ok(UploadReceipt { filename, body })
    }

    async fn info(&self) -> Result<RootInfo, ClientError> {
        let url = self.url_for(&self.routes.info)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        return Err(ClientError::new(
            FailureKind::HttpStatus(status.as_u16()),
            failure_message(&bytes, status),
        ));
    }
    serde_json::from_slice(&bytes)
        .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
}

/// Prefers the relay's `error`, then the backend's `detail`, then the status line.
fn failure_message(body: &Bytes, status: StatusCode) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();
    let field = parsed
        .as_ref()
        .and_then(|value| value.get("error").or_else(|| value.get("detail")));
    match field {
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => status.to_string(),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ClientError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
