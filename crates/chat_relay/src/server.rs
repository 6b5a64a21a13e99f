use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use chat_logging::{chat_info, chat_warn};
use tokio::net::TcpListener;
use url::Url;

use crate::routes::{self, RelayState};
use crate::Forwarder;

/// Relay server configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    /// Base URL of the document backend, ending in `/`.
    pub backend_url: Url,
}

/// Relay server instance
pub struct RelayServer {
    config: RelayConfig,
    router: Router,
}

impl RelayServer {
    /// Create a new relay server
    pub fn new(config: RelayConfig) -> Result<Self> {
        let forwarder = Forwarder::new(config.backend_url.clone())?;
        let router = routes::create_router(RelayState {
            forwarder: Arc::new(forwarder),
        });
        Ok(Self { config, router })
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener until Ctrl-C.
    pub async fn serve_on(self, listener: TcpListener) -> Result<()> {
        let local_addr = listener.local_addr()?;
        chat_info!(
            "Relay listening on http://{} -> {}",
            local_addr,
            self.config.backend_url
        );
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        chat_info!("Relay stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        chat_warn!("Could not install Ctrl-C handler: {}", err);
        std::future::pending::<()>().await;
    }
}
