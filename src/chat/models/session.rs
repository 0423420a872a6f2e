use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::message::{Message, Role};

pub const DEFAULT_TITLE: &str = "New Chat";

/// Maximum title length in characters, taken from the first user text.
pub const TITLE_MAX_CHARS: usize = 20;

/// Greeting every fresh session opens with.
pub const GREETING: &str = "ආයුබෝවන්! මම KAL AI Assistant. මට රූප, PDF සහ Excel ගොනු කියවන්න පුළුවන්. ඔබට උදව් කරන්නේ කොහොමද?";

/// An independent, titled, persisted conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Session {
    /// Create a fresh session with the synthetic model greeting.
    pub fn new() -> Self {
        let now = unix_now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            messages: vec![Message::model(GREETING)],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_TITLE
    }

    /// Append messages, dropping any that carry neither text nor attachments.
    /// While the title is still the default, the first appended non-empty user
    /// text becomes the title (truncated to TITLE_MAX_CHARS characters).
    pub fn append_messages(&mut self, messages: Vec<Message>) {
        for message in messages {
            if message.is_empty() {
                tracing::debug!(session_id = %self.id, "Dropping empty message");
                continue;
            }
            if self.has_default_title()
                && message.role == Role::User
                && !message.text.trim().is_empty()
            {
                self.title = truncate_chars(&message.text, TITLE_MAX_CHARS);
            }
            self.messages.push(message);
        }
        self.updated_at = unix_now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Truncate text to max length (characters, not bytes).
fn truncate_chars(text: &str, max_len: usize) -> String {
    text.chars().take(max_len).collect()
}
