use crate::{
    ActionButton, AppState, ChatOutcome, Effect, Message, Msg, UploadOutcome, UploadStatus,
    CHAT_FAILURE_REPLY, EMPTY_REPLY_FALLBACK,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SubmitClicked => {
            // Input is disabled while a reply is pending.
            if state.is_chat_pending() || state.input().trim().is_empty() {
                return (state, Vec::new());
            }
            let message = state.take_input();
            // Optimistic: the user message stays even if the request fails.
            state.push_message(Message::user(message.clone()));
            let request_id = state.begin_chat();
            vec![Effect::SendChat {
                request_id,
                message,
            }]
        }
        Msg::ChatCompleted {
            request_id,
            outcome,
        } => {
            let mut effects = Vec::new();
            match outcome {
                ChatOutcome::Replied { reply } => {
                    let text = reply.unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string());
                    let error_reply = state.reply_policy().is_error_reply(&text);
                    if error_reply {
                        effects.push(Effect::ErrorReplyObserved {
                            request_id,
                            text: text.clone(),
                        });
                    }
                    state.push_message(Message {
                        error_reply,
                        ..Message::bot(text)
                    });
                }
                ChatOutcome::Failed { .. } => {
                    state.push_message(Message::bot(CHAT_FAILURE_REPLY));
                }
            }
            state.settle_chat();
            effects
        }
        Msg::ActionClicked => {
            if state.is_upload_pending() {
                return (state, Vec::new());
            }
            match state.action() {
                ActionButton::Pick => vec![Effect::OpenFilePicker],
                ActionButton::Upload => start_upload(&mut state),
            }
        }
        Msg::UploadClicked => {
            if state.is_upload_pending() {
                return (state, Vec::new());
            }
            start_upload(&mut state)
        }
        Msg::FileSelected(file) => {
            if state.is_upload_pending() {
                return (state, Vec::new());
            }
            state.stage_file(file);
            Vec::new()
        }
        Msg::UploadCompleted { outcome, .. } => {
            match outcome {
                UploadOutcome::Uploaded { filename } => {
                    let filename = filename
                        .or_else(|| state.staged_file().map(|file| file.filename.clone()))
                        .unwrap_or_default();
                    state.set_upload_status(UploadStatus::Uploaded { filename });
                    state.clear_staged_file();
                }
                UploadOutcome::Failed { detail } => {
                    state.set_upload_status(UploadStatus::Failed { detail });
                }
            }
            state.settle_upload();
            Vec::new()
        }
    };

    (state, effects)
}

fn start_upload(state: &mut AppState) -> Vec<Effect> {
    let Some(file) = state.staged_file().cloned() else {
        state.set_upload_status(UploadStatus::MissingFile);
        return Vec::new();
    };
    state.set_upload_status(UploadStatus::Uploading {
        filename: file.filename.clone(),
    });
    let request_id = state.begin_upload();
    vec![Effect::UploadFile { request_id, file }]
}
