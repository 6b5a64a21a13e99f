use std::path::PathBuf;

pub const HELP: &str = "\
Type a message and press Enter to chat.
  /file           pick a file, or upload the staged one
  /attach <path>  stage a file for upload
  /detach         clear the staged file
  /upload         upload the staged file
  /status         show the upload status
  /help           show this help
  /quit           leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Action,
    Attach(PathBuf),
    Detach,
    Upload,
    Status,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Say(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "file" => Command::Action,
        "attach" if !arg.is_empty() => Command::Attach(PathBuf::from(arg)),
        "detach" => Command::Detach,
        "upload" => Command::Upload,
        "status" => Command::Status,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_sent_as_typed() {
        assert_eq!(parse_line("  hello  "), Command::Say("  hello  ".to_string()));
        assert_eq!(parse_line(""), Command::Say(String::new()));
    }

    #[test]
    fn attach_takes_rest_of_line_as_path() {
        assert_eq!(
            parse_line("/attach  my docs/contract.docx "),
            Command::Attach(PathBuf::from("my docs/contract.docx"))
        );
    }

    #[test]
    fn attach_without_path_is_unknown() {
        assert_eq!(parse_line("/attach"), Command::Unknown("/attach".to_string()));
    }

    #[test]
    fn commands_are_recognised() {
        assert_eq!(parse_line("/file"), Command::Action);
        assert_eq!(parse_line("/upload"), Command::Upload);
        assert_eq!(parse_line("/detach"), Command::Detach);
        assert_eq!(parse_line("/exit"), Command::Quit);
        assert_eq!(parse_line("/bogus"), Command::Unknown("/bogus".to_string()));
    }
}
