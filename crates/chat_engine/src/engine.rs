use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use chat_logging::{chat_debug, chat_warn};
use thiserror::Error;

use crate::client::Backend;
use crate::{EngineEvent, RequestId};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Chat {
        request_id: RequestId,
        message: String,
    },
    Upload {
        request_id: RequestId,
        path: PathBuf,
        filename: String,
    },
}

/// Runs backend requests on a background tokio runtime.
///
/// Commands never block the caller; each request is spawned independently and
/// reports back through the event receiver returned by [`EngineHandle::new`].
/// Nothing here serializes requests, so overlapping calls are allowed.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        backend: Arc<dyn Backend>,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(backend.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn send_chat(&self, request_id: RequestId, message: impl Into<String>) {
        self.send(EngineCommand::Chat {
            request_id,
            message: message.into(),
        });
    }

    pub fn upload(&self, request_id: RequestId, path: PathBuf, filename: impl Into<String>) {
        self.send(EngineCommand::Upload {
            request_id,
            path,
            filename: filename.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            chat_warn!("Engine thread has stopped; dropping command");
        }
    }
}

async fn handle_command(
    backend: &dyn Backend,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Chat {
            request_id,
            message,
        } => {
            let result = backend.chat(&message).await;
            chat_debug!("Chat request {} settled ok={}", request_id, result.is_ok());
            EngineEvent::ChatCompleted { request_id, result }
        }
        EngineCommand::Upload {
            request_id,
            path,
            filename,
        } => {
            let result = backend.upload(&path, &filename).await;
            chat_debug!("Upload request {} settled ok={}", request_id, result.is_ok());
            EngineEvent::UploadCompleted { request_id, result }
        }
    };
    let _ = event_tx.send(event);
}
