use crate::{ActionButton, Sender, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub messages: Vec<MessageRow>,
    pub input: String,
    pub input_enabled: bool,
    pub action: ActionButton,
    pub action_enabled: bool,
    pub upload_status: String,
    pub staged_filename: Option<String>,
    /// The transcript grew; the renderer should reveal the newest entry.
    pub scroll_to_latest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub sender: Sender,
    pub text: String,
    pub highlight: bool,
}
