use std::fmt;
use std::path::{Path, PathBuf};

use crate::view_model::{AppViewModel, MessageRow};
use crate::ReplyPolicy;

pub type RequestId = u64;

/// Bot text used when the chat response carried no reply.
pub const EMPTY_REPLY_FALLBACK: &str = "No reply received from the assistant.";
/// Bot text appended when the chat request could not be completed.
pub const CHAT_FAILURE_REPLY: &str =
    "Sorry, the assistant could not be reached. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub error_reply: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            error_reply: false,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            error_reply: false,
        }
    }
}

/// A user-chosen file held until it is uploaded or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub filename: String,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = display_name(&path);
        Self { path, filename }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    Selected {
        filename: String,
    },
    Uploading {
        filename: String,
    },
    Uploaded {
        filename: String,
    },
    Failed {
        detail: String,
    },
    MissingFile,
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Idle => write!(f, "No file selected"),
            UploadStatus::Selected { filename } => write!(f, "Selected file: {filename}"),
            UploadStatus::Uploading { filename } => write!(f, "Uploading {filename}..."),
            UploadStatus::Uploaded { filename } => {
                write!(f, "File {filename} uploaded successfully")
            }
            UploadStatus::Failed { detail } => write!(f, "Upload failed: {detail}"),
            UploadStatus::MissingFile => write!(f, "Please select a file first"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingReply,
}

/// The overloaded pick/upload control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionButton {
    #[default]
    Pick,
    Upload,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    messages: Vec<Message>,
    input: String,
    staged_file: Option<SelectedFile>,
    upload_status: UploadStatus,
    pending_chat: Option<RequestId>,
    pending_upload: Option<RequestId>,
    next_request_id: RequestId,
    reply_policy: ReplyPolicy,
    dirty: bool,
    scroll_pending: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply_policy(reply_policy: ReplyPolicy) -> Self {
        Self {
            reply_policy,
            ..Self::default()
        }
    }

    pub fn session(&self) -> SessionState {
        if self.pending_chat.is_some() || self.pending_upload.is_some() {
            SessionState::AwaitingReply
        } else {
            SessionState::Idle
        }
    }

    pub fn action(&self) -> ActionButton {
        if self.staged_file.is_some() {
            ActionButton::Upload
        } else {
            ActionButton::Pick
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn staged_file(&self) -> Option<&SelectedFile> {
        self.staged_file.as_ref()
    }

    pub fn upload_status(&self) -> &UploadStatus {
        &self.upload_status
    }

    pub fn reply_policy(&self) -> &ReplyPolicy {
        &self.reply_policy
    }

    pub fn is_chat_pending(&self) -> bool {
        self.pending_chat.is_some()
    }

    pub fn is_upload_pending(&self) -> bool {
        self.pending_upload.is_some()
    }

    pub fn view(&self) -> AppViewModel {
        let highlight = self.reply_policy.highlight_errors;
        AppViewModel {
            session: self.session(),
            messages: self
                .messages
                .iter()
                .map(|message| MessageRow {
                    sender: message.sender,
                    text: message.text.clone(),
                    highlight: highlight && message.error_reply,
                })
                .collect(),
            input: self.input.clone(),
            input_enabled: !self.is_chat_pending(),
            action: self.action(),
            action_enabled: !self.is_upload_pending(),
            upload_status: self.upload_status.to_string(),
            staged_filename: self.staged_file.as_ref().map(|file| file.filename.clone()),
            scroll_to_latest: self.scroll_pending,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Returns whether the transcript grew since the last call and clears the flag.
    pub fn consume_scroll(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }

    pub(crate) fn set_input(&mut self, input: String) {
        if self.input != input {
            self.input = input;
            self.mark_dirty();
        }
    }

    pub(crate) fn take_input(&mut self) -> String {
        self.mark_dirty();
        std::mem::take(&mut self.input)
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.scroll_pending = true;
        self.mark_dirty();
    }

    pub(crate) fn begin_chat(&mut self) -> RequestId {
        let id = self.allocate_request_id();
        self.pending_chat = Some(id);
        self.mark_dirty();
        id
    }

    pub(crate) fn settle_chat(&mut self) {
        self.pending_chat = None;
        self.mark_dirty();
    }

    pub(crate) fn begin_upload(&mut self) -> RequestId {
        let id = self.allocate_request_id();
        self.pending_upload = Some(id);
        self.mark_dirty();
        id
    }

    pub(crate) fn settle_upload(&mut self) {
        self.pending_upload = None;
        self.mark_dirty();
    }

    pub(crate) fn stage_file(&mut self, file: Option<SelectedFile>) {
        self.upload_status = match &file {
            Some(file) => UploadStatus::Selected {
                filename: file.filename.clone(),
            },
            None => UploadStatus::Idle,
        };
        self.staged_file = file;
        self.mark_dirty();
    }

    pub(crate) fn clear_staged_file(&mut self) {
        self.staged_file = None;
        self.mark_dirty();
    }

    pub(crate) fn set_upload_status(&mut self, status: UploadStatus) {
        self.upload_status = status;
        self.mark_dirty();
    }

    fn allocate_request_id(&mut self) -> RequestId {
        self.next_request_id += 1;
        self.next_request_id
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_file_uses_final_path_component() {
        let file = SelectedFile::from_path("/tmp/docs/contract.docx");
        assert_eq!(file.filename, "contract.docx");
    }

    #[test]
    fn status_texts_are_human_readable() {
        assert_eq!(UploadStatus::Idle.to_string(), "No file selected");
        assert_eq!(
            UploadStatus::Failed {
                detail: "corrupt file".into()
            }
            .to_string(),
            "Upload failed: corrupt file"
        );
    }
}
