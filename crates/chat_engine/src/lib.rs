//! Chat engine: outbound HTTP client and effect execution.
mod client;
mod engine;
mod types;

pub use client::{
    endpoint_url, normalize_base_url, Backend, ClientRoutes, ClientSettings, HttpBackend,
};
pub use engine::{EngineError, EngineHandle};
pub use types::{
    ChatReply, ClientError, EngineEvent, FailureKind, RequestId, RootInfo, UploadReceipt,
};
