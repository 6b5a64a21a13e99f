use std::sync::{mpsc, Arc};
use std::thread;

use chat_core::{ChatOutcome, Effect, Msg, UploadOutcome};
use chat_engine::{Backend, EngineEvent, EngineHandle};
use chat_logging::{chat_error, chat_info, chat_warn};

use super::AppEvent;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(backend: Arc<dyn Backend>, app_tx: mpsc::Sender<AppEvent>) -> anyhow::Result<Self> {
        let (engine, events) = EngineHandle::new(backend)?;
        spawn_event_loop(events, app_tx);
        Ok(Self { engine })
    }

    /// Runs backend effects. The file picker is interactive and handled by the caller.
    pub fn run(&self, effect: Effect) {
        match effect {
            Effect::SendChat {
                request_id,
                message,
            } => {
                chat_info!("SendChat request_id={} message_len={}", request_id, message.len());
                self.engine.send_chat(request_id, message);
            }
            Effect::UploadFile { request_id, file } => {
                chat_info!("UploadFile request_id={} path={:?}", request_id, file.path);
                self.engine.upload(request_id, file.path, file.filename);
            }
            Effect::ErrorReplyObserved { request_id, text } => {
                chat_warn!("Request {} got an error reply: {}", request_id, text);
            }
            Effect::OpenFilePicker => {}
        }
    }
}

fn spawn_event_loop(events: mpsc::Receiver<EngineEvent>, app_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for event in events {
            if app_tx.send(AppEvent::Msg(event_to_msg(event))).is_err() {
                break;
            }
        }
    });
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ChatCompleted { request_id, result } => {
            let outcome = match result {
                Ok(reply) => ChatOutcome::Replied { reply: reply.reply },
                Err(err) => {
                    chat_error!("Chat request {} failed: {}", request_id, err);
                    ChatOutcome::Failed {
                        error: err.to_string(),
                    }
                }
            };
            Msg::ChatCompleted {
                request_id,
                outcome,
            }
        }
        EngineEvent::UploadCompleted { request_id, result } => {
            let outcome = match result {
                Ok(receipt) => {
                    chat_info!("Upload {} accepted: {}", request_id, receipt.body);
                    UploadOutcome::Uploaded {
                        filename: receipt.filename,
                    }
                }
                Err(err) => {
                    chat_warn!("Upload {} failed: {}", request_id, err);
                    UploadOutcome::Failed {
                        detail: err.message,
                    }
                }
            };
            Msg::UploadCompleted {
                request_id,
                outcome,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_engine::{ChatReply, ClientError, FailureKind, UploadReceipt};

    #[test]
    fn chat_error_becomes_failed_outcome() {
        let msg = event_to_msg(EngineEvent::ChatCompleted {
            request_id: 4,
            result: Err(ClientError {
                kind: FailureKind::Network,
                message: "connection refused".to_string(),
            }),
        });
        assert!(matches!(
            msg,
            Msg::ChatCompleted {
                request_id: 4,
                outcome: ChatOutcome::Failed { .. }
            }
        ));
    }

    #[test]
    fn chat_reply_is_passed_through() {
        let msg = event_to_msg(EngineEvent::ChatCompleted {
            request_id: 1,
            result: Ok(ChatReply { reply: None }),
        });
        assert_eq!(
            msg,
            Msg::ChatCompleted {
                request_id: 1,
                outcome: ChatOutcome::Replied { reply: None },
            }
        );
    }

    #[test]
    fn upload_failure_keeps_relay_detail() {
        let msg = event_to_msg(EngineEvent::UploadCompleted {
            request_id: 2,
            result: Err(ClientError {
                kind: FailureKind::HttpStatus(500),
                message: "corrupt file".to_string(),
            }),
        });
        assert_eq!(
            msg,
            Msg::UploadCompleted {
                request_id: 2,
                outcome: UploadOutcome::Failed {
                    detail: "corrupt file".to_string()
                },
            }
        );
    }

    #[test]
    fn upload_success_reports_server_filename() {
        let msg = event_to_msg(EngineEvent::UploadCompleted {
            request_id: 3,
            result: Ok(UploadReceipt {
                filename: Some("contract.docx".to_string()),
                body: serde_json::json!({ "filename": "contract.docx" }),
            }),
        });
        assert_eq!(
            msg,
            Msg::UploadCompleted {
                request_id: 3,
                outcome: UploadOutcome::Uploaded {
                    filename: Some("contract.docx".to_string())
                },
            }
        );
    }
}
