use serde::{Deserialize, Serialize};

/// Prefixes the document backend puts in front of replies it produced while failing.
pub const DEFAULT_ERROR_PREFIXES: &[&str] = &["Помилка", "Вибачте, сталася помилка"];

/// How bot replies that start with an error marker are treated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyPolicy {
    pub error_prefixes: Vec<String>,
    /// Render flagged replies distinctly. Off means they are only logged.
    pub highlight_errors: bool,
}

impl Default for ReplyPolicy {
    fn default() -> Self {
        Self {
            error_prefixes: DEFAULT_ERROR_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
            highlight_errors: false,
        }
    }
}

impl ReplyPolicy {
    pub fn is_error_reply(&self, text: &str) -> bool {
        let text = text.trim_start();
        self.error_prefixes
            .iter()
            .filter(|prefix| !prefix.is_empty())
            .any(|prefix| text.starts_with(prefix.as_str()))
    }
}
