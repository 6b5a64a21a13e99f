//! Terminal front end for the chat state machine.
mod app;
mod effects;
mod input;
mod render;

pub use app::run_chat;

/// Everything the UI thread reacts to.
#[derive(Debug)]
pub enum AppEvent {
    /// A line typed by the user.
    Line(String),
    /// Standard input reached end of file.
    InputClosed,
    /// A settled request, already translated for the state machine.
    Msg(chat_core::Msg),
}
