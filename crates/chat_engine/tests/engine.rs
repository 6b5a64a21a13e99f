use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chat_engine::{
    Backend, ChatReply, ClientError, EngineEvent, EngineHandle, FailureKind, RootInfo,
    UploadReceipt,
};

struct EchoBackend;

#[async_trait::async_trait]
impl Backend for EchoBackend {
    async fn chat(&self, message: &str) -> Result<ChatReply, ClientError> {
        if message == "fail" {
            return Err(ClientError {
                kind: FailureKind::Network,
                message: "connection refused".to_string(),
            });
        }
        Ok(ChatReply {
            reply: Some(format!("echo: {message}")),
        })
    }

    async fn upload(&self, _path: &Path, filename: &str) -> Result<UploadReceipt, ClientError> {
        Ok(UploadReceipt {
            filename: Some(filename.to_string()),
            body: serde_json::json!({ "filename": filename }),
        })
    }

    async fn info(&self) -> Result<RootInfo, ClientError> {
        Ok(RootInfo {
            message: "hello".to_string(),
        })
    }
}

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn chat_command_reports_completion() {
    let (engine, events) = EngineHandle::new(Arc::new(EchoBackend)).expect("engine");
    engine.send_chat(7, "ping");

    let event = events.recv_timeout(WAIT).expect("event");
    assert_eq!(
        event,
        EngineEvent::ChatCompleted {
            request_id: 7,
            result: Ok(ChatReply {
                reply: Some("echo: ping".to_string())
            }),
        }
    );
}

#[test]
fn failures_are_delivered_as_events() {
    let (engine, events) = EngineHandle::new(Arc::new(EchoBackend)).expect("engine");
    engine.send_chat(1, "fail");

    match events.recv_timeout(WAIT).expect("event") {
        EngineEvent::ChatCompleted { request_id, result } => {
            assert_eq!(request_id, 1);
            assert_eq!(result.unwrap_err().kind, FailureKind::Network);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn overlapping_requests_all_complete() {
    let (engine, events) = EngineHandle::new(Arc::new(EchoBackend)).expect("engine");
    engine.send_chat(1, "a");
    engine.upload(2, "contract.docx".into(), "contract.docx");
    engine.send_chat(3, "b");

    let mut ids: Vec<u64> = (0..3)
        .map(|_| match events.recv_timeout(WAIT).expect("event") {
            EngineEvent::ChatCompleted { request_id, .. } => request_id,
            EngineEvent::UploadCompleted { request_id, .. } => request_id,
        })
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);
}
