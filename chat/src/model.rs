//! Chat session and message records.
//!
//! DESIGN
//! ======
//! Records are plain serde structs so the same shape is used in memory and in
//! the persisted snapshot. Optional persisted fields (`pinned`, `created_at`)
//! carry serde defaults so older snapshots still load.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// First bot message of every new session.
pub const DEFAULT_GREETING: &str = "Hello 👋 I’m Querion your AI assistant.";
/// Title given by "new chat" when the caller supplies none.
pub const NEW_CHAT_TITLE: &str = "New chat";
/// Title of the session seeded on first load.
pub const WELCOME_TITLE: &str = "Welcome";
/// Maximum length, in characters, of a title derived from a message.
pub const AUTO_TITLE_MAX_CHARS: usize = 30;

const PLACEHOLDER_TITLES: [&str; 2] = [NEW_CHAT_TITLE, WELCOME_TITLE];

pub type ChatId = Uuid;

/// Who authored a message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    #[default]
    User,
    Bot,
}

/// A single chat message. Never mutated after it is appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    #[must_use]
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self { sender, text: text.into() }
    }

    #[must_use]
    pub fn greeting() -> Self {
        Self::new(Sender::Bot, DEFAULT_GREETING)
    }
}

/// One conversation thread.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: ChatId,
    pub title: String,
    #[serde(default)]
    pub pinned: bool,
    /// Milliseconds since the Unix epoch. Refreshed by pin toggles.
    #[serde(default)]
    pub created_at: i64,
    pub messages: Vec<Message>,
}

impl ChatSession {
    /// Build a fresh session holding only the default greeting.
    #[must_use]
    pub fn new(title: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            pinned: false,
            created_at,
            messages: vec![Message::greeting()],
        }
    }

    /// Whether the title is still one of the defaults handed out on creation.
    #[must_use]
    pub fn has_placeholder_title(&self) -> bool {
        PLACEHOLDER_TITLES.contains(&self.title.as_str())
    }

    /// Whether nothing beyond the initial greeting has been appended yet.
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        self.messages.len() <= 1
    }
}

/// Derive a session title from a message: its first non-blank line, trimmed
/// and cut to [`AUTO_TITLE_MAX_CHARS`] characters.
///
/// Returns `None` when the text has no visible content.
#[must_use]
pub fn derive_title(text: &str) -> Option<String> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    Some(line.chars().take(AUTO_TITLE_MAX_CHARS).collect())
}
