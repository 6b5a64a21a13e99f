#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the message input box.
    InputChanged(String),
    /// User submitted the current input as a chat message.
    SubmitClicked,
    /// The chat request settled.
    ChatCompleted {
        request_id: crate::RequestId,
        outcome: ChatOutcome,
    },
    /// User clicked the overloaded pick/upload button.
    ActionClicked,
    /// User asked for an upload directly, bypassing the picker.
    UploadClicked,
    /// File picker closed; `None` clears the staged file.
    FileSelected(Option<crate::SelectedFile>),
    /// The upload request settled.
    UploadCompleted {
        request_id: crate::RequestId,
        outcome: UploadOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// Backend answered; `reply` is absent when the response had no reply field.
    Replied { reply: Option<String> },
    /// Transport or decode failure.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Upload accepted; `filename` is the name reported by the server.
    Uploaded { filename: Option<String> },
    /// Upload rejected or the relay could not be reached.
    Failed { detail: String },
}
