//! Chat core: pure transcript/upload state machine and view-model helpers.
mod effect;
mod msg;
mod policy;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{ChatOutcome, Msg, UploadOutcome};
pub use policy::{ReplyPolicy, DEFAULT_ERROR_PREFIXES};
pub use state::{
    ActionButton, AppState, Message, RequestId, SelectedFile, Sender, SessionState, UploadStatus,
    CHAT_FAILURE_REPLY, EMPTY_REPLY_FALLBACK,
};
pub use update::update;
pub use view_model::{AppViewModel, MessageRow};
