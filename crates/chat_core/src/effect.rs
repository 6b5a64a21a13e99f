use crate::{RequestId, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the user's text to the chat endpoint.
    SendChat { request_id: RequestId, message: String },
    /// Ask the front end to let the user choose a file.
    OpenFilePicker,
    /// Relay the staged file to the upload endpoint.
    UploadFile {
        request_id: RequestId,
        file: SelectedFile,
    },
    /// A bot reply matched a configured error prefix. Only reported, never styled
    /// unless the reply policy asks for it.
    ErrorReplyObserved { request_id: RequestId, text: String },
}
