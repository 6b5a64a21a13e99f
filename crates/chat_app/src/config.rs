//! Startup configuration: RON file, then environment and command-line overrides.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chat_core::ReplyPolicy;
use chat_engine::{normalize_base_url, ClientSettings};
use chat_logging::chat_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::cli::GlobalArgs;

pub const DEFAULT_CONFIG_FILE: &str = "chat_relay.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid {field} `{value}`: {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub relay_url: String,
    pub bind_addr: SocketAddr,
    /// Off by default: requests wait for the backend as long as it takes.
    pub request_timeout_secs: Option<u64>,
    pub reply_policy: ReplyPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            relay_url: "http://127.0.0.1:3000".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            request_timeout_secs: None,
            reply_policy: ReplyPolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        let config = Self::from_ron_str(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        chat_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, args: &GlobalArgs) {
        if let Some(url) = &args.backend_url {
            self.backend_url = url.clone();
        }
        if let Some(url) = &args.relay_url {
            self.relay_url = url.clone();
        }
        if let Some(bind) = args.bind {
            self.bind_addr = bind;
        }
    }

    pub fn backend_base(&self) -> Result<Url, ConfigError> {
        parse_base("backend_url", &self.backend_url)
    }

    pub fn relay_base(&self) -> Result<Url, ConfigError> {
        parse_base("relay_url", &self.relay_url)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            connect_timeout: None,
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

fn parse_base(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    normalize_base_url(value).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })
}
