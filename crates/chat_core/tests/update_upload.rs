use chat_core::{
    update, ActionButton, AppState, Effect, Msg, SelectedFile, SessionState, UploadOutcome,
    UploadStatus,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    chat_logging::initialize_for_tests();
}

fn select(state: AppState, path: &str) -> AppState {
    let (state, effects) = update(
        state,
        Msg::FileSelected(Some(SelectedFile::from_path(path))),
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn action_opens_picker_when_nothing_staged() {
    init_logging();
    let state = AppState::new();
    assert_eq!(state.action(), ActionButton::Pick);

    let (state, effects) = update(state, Msg::ActionClicked);
    assert_eq!(effects, vec![Effect::OpenFilePicker]);
    assert_eq!(state.view().session, SessionState::Idle);
}

#[test]
fn selecting_file_updates_status_and_action() {
    init_logging();
    let state = select(AppState::new(), "/home/me/contract.docx");

    let view = state.view();
    assert_eq!(view.action, ActionButton::Upload);
    assert_eq!(view.staged_filename.as_deref(), Some("contract.docx"));
    assert_eq!(view.upload_status, "Selected file: contract.docx");
}

#[test]
fn clearing_selection_resets_status() {
    init_logging();
    let state = select(AppState::new(), "contract.docx");
    let (state, _) = update(state, Msg::FileSelected(None));

    assert_eq!(state.action(), ActionButton::Pick);
    assert_eq!(state.upload_status(), &UploadStatus::Idle);
}

#[test]
fn selecting_again_replaces_staged_file() {
    init_logging();
    let state = select(AppState::new(), "a.docx");
    let state = select(state, "b.docx");

    assert_eq!(state.staged_file().unwrap().filename, "b.docx");
}

#[test]
fn action_uploads_staged_file() {
    init_logging();
    let state = select(AppState::new(), "/tmp/contract.docx");
    let (state, effects) = update(state, Msg::ActionClicked);

    assert_eq!(
        effects,
        vec![Effect::UploadFile {
            request_id: 1,
            file: SelectedFile::from_path("/tmp/contract.docx"),
        }]
    );
    let view = state.view();
    assert_eq!(view.session, SessionState::AwaitingReply);
    assert!(!view.action_enabled);
    assert_eq!(view.upload_status, "Uploading contract.docx...");
}

#[test]
fn upload_without_staged_file_only_sets_status() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::UploadClicked);

    assert!(effects.is_empty());
    assert!(state.messages().is_empty());
    assert_eq!(state.upload_status(), &UploadStatus::MissingFile);
    assert_eq!(state.view().upload_status, "Please select a file first");
    assert_eq!(state.view().session, SessionState::Idle);
    assert!(!state.consume_scroll());
}

#[test]
fn successful_upload_reports_server_filename_and_clears_file() {
    init_logging();
    let state = select(AppState::new(), "local-name.docx");
    let (state, _) = update(state, Msg::ActionClicked);
    let (state, effects) = update(
        state,
        Msg::UploadCompleted {
            request_id: 1,
            outcome: UploadOutcome::Uploaded {
                filename: Some("contract.docx".to_string()),
            },
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.upload_status(),
        &UploadStatus::Uploaded {
            filename: "contract.docx".to_string()
        }
    );
    assert!(state.staged_file().is_none());
    assert_eq!(state.action(), ActionButton::Pick);
    assert_eq!(state.view().session, SessionState::Idle);
}

#[test]
fn failed_upload_keeps_file_staged() {
    init_logging();
    let state = select(AppState::new(), "contract.docx");
    let (state, _) = update(state, Msg::ActionClicked);
    let (state, _) = update(
        state,
        Msg::UploadCompleted {
            request_id: 1,
            outcome: UploadOutcome::Failed {
                detail: "corrupt file".to_string(),
            },
        },
    );

    let view = state.view();
    assert_eq!(view.upload_status, "Upload failed: corrupt file");
    assert_eq!(view.action, ActionButton::Upload);
    assert_eq!(view.session, SessionState::Idle);
    assert!(view.action_enabled);
}

#[test]
fn controls_are_ignored_while_upload_in_flight() {
    init_logging();
    let state = select(AppState::new(), "contract.docx");
    let (state, _) = update(state, Msg::ActionClicked);

    let (state, effects) = update(state, Msg::ActionClicked);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::UploadClicked);
    assert!(effects.is_empty());
    let (state, _) = update(state, Msg::FileSelected(None));
    assert_eq!(state.staged_file().unwrap().filename, "contract.docx");
}

#[test]
fn chat_and_upload_can_be_pending_together() {
    init_logging();
    let state = select(AppState::new(), "contract.docx");
    let (state, _) = update(state, Msg::ActionClicked);
    let (state, _) = update(state, Msg::InputChanged("summarize it".to_string()));
    let (state, effects) = update(state, Msg::SubmitClicked);

    assert_eq!(
        effects,
        vec![Effect::SendChat {
            request_id: 2,
            message: "summarize it".to_string(),
        }]
    );

    let (state, _) = update(
        state,
        Msg::UploadCompleted {
            request_id: 1,
            outcome: UploadOutcome::Uploaded { filename: None },
        },
    );
    // Chat still pending.
    assert_eq!(state.view().session, SessionState::AwaitingReply);
    assert_eq!(
        state.upload_status(),
        &UploadStatus::Uploaded {
            filename: "contract.docx".to_string()
        }
    );
}
