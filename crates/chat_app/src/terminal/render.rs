use std::io::{self, Write};

use chat_core::{ActionButton, AppViewModel, MessageRow, Sender, SessionState};
use chrono::Local;

/// Prints view-model changes as a scrolling transcript.
///
/// Keeps track of what is already on screen so each render only appends the
/// newest entries, which is how the terminal "scrolls" to the latest message.
pub struct Renderer<W: Write> {
    out: W,
    shown_messages: usize,
    last_status: Option<String>,
    was_waiting: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown_messages: 0,
            last_status: None,
            was_waiting: false,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        if view.scroll_to_latest {
            let stamp = Local::now().format("%H:%M");
            for row in view.messages.iter().skip(self.shown_messages) {
                writeln!(self.out, "[{stamp}] {}", format_message(row))?;
            }
            self.shown_messages = view.messages.len();
        }

        let waiting = view.session == SessionState::AwaitingReply;
        if waiting && !self.was_waiting {
            writeln!(self.out, "   ... waiting for the backend")?;
        }
        self.was_waiting = waiting;

        if self.last_status.as_deref() != Some(view.upload_status.as_str()) {
            writeln!(self.out, "[upload] {}", view.upload_status)?;
            self.last_status = Some(view.upload_status.clone());
        }

        write!(self.out, "{}", prompt(view))?;
        self.out.flush()
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn format_message(row: &MessageRow) -> String {
    let who = match row.sender {
        Sender::User => "you",
        Sender::Bot if row.highlight => "bot!",
        Sender::Bot => "bot",
    };
    let mut lines = row.text.lines();
    let first = lines.next().unwrap_or_default();
    let mut out = format!("{who:>4}> {first}");
    for line in lines {
        out.push_str("\n      ");
        out.push_str(line);
    }
    out
}

pub fn prompt(view: &AppViewModel) -> String {
    let action = match (view.action, view.staged_filename.as_deref()) {
        _ if !view.action_enabled => "/file busy".to_string(),
        (ActionButton::Upload, Some(name)) => format!("/file uploads {name}"),
        _ => "/file picks".to_string(),
    };
    format!("({action}) > ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sender: Sender, text: &str, highlight: bool) -> MessageRow {
        MessageRow {
            sender,
            text: text.to_string(),
            highlight,
        }
    }

    fn view_with(messages: Vec<MessageRow>, scroll: bool) -> AppViewModel {
        AppViewModel {
            session: SessionState::Idle,
            messages,
            input_enabled: true,
            action_enabled: true,
            upload_status: "No file selected".to_string(),
            scroll_to_latest: scroll,
            ..AppViewModel::default()
        }
    }

    #[test]
    fn message_rows_are_labelled() {
        assert_eq!(format_message(&row(Sender::User, "hi", false)), " you> hi");
        assert_eq!(format_message(&row(Sender::Bot, "hello", false)), " bot> hello");
        assert_eq!(format_message(&row(Sender::Bot, "Error: x", true)), "bot!> Error: x");
    }

    #[test]
    fn multi_line_text_is_indented() {
        assert_eq!(
            format_message(&row(Sender::Bot, "a\nb", false)),
            " bot> a\n      b"
        );
    }

    #[test]
    fn only_new_messages_are_printed() {
        let mut renderer = Renderer::new(Vec::new());
        renderer
            .render(&view_with(vec![row(Sender::User, "first", false)], true))
            .unwrap();
        renderer
            .render(&view_with(
                vec![
                    row(Sender::User, "first", false),
                    row(Sender::Bot, "second", false),
                ],
                true,
            ))
            .unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out.matches("first").count(), 1);
        assert_eq!(out.matches("second").count(), 1);
        assert_eq!(out.matches("[upload] No file selected").count(), 1);
    }

    #[test]
    fn prompt_reflects_action_button() {
        let mut view = view_with(Vec::new(), false);
        assert_eq!(prompt(&view), "(/file picks) > ");

        view.action = ActionButton::Upload;
        view.staged_filename = Some("contract.docx".to_string());
        assert_eq!(prompt(&view), "(/file uploads contract.docx) > ");

        view.action_enabled = false;
        assert_eq!(prompt(&view), "(/file busy) > ");
    }

    #[test]
    fn waiting_line_is_printed_once_per_request() {
        let mut renderer = Renderer::new(Vec::new());
        let mut view = view_with(Vec::new(), false);
        view.session = SessionState::AwaitingReply;
        renderer.render(&view).unwrap();
        renderer.render(&view).unwrap();
        view.session = SessionState::Idle;
        renderer.render(&view).unwrap();
        view.session = SessionState::AwaitingReply;
        renderer.render(&view).unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out.matches("... waiting for the backend").count(), 2);
    }
}
