//! Same-origin relay: forwards chat and upload calls to the document backend.
mod error;
mod forward;
mod routes;
mod server;

pub use error::RelayError;
pub use forward::Forwarder;
pub use routes::{create_router, RelayState, CHAT_ROUTE, INFO_ROUTE, UPLOAD_ROUTE};
pub use server::{RelayConfig, RelayServer};
