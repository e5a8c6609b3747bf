//! Payload types carried by an [`Update`](crate::Update).
//!
//! Only the fields that filters look at (or that are needed to make sense of
//! an update in logs) are modelled. Unknown fields in the incoming JSON are
//! ignored.

use serde::{Deserialize, Serialize};

// ============================================================================
// Shared Types
// ============================================================================

/// A user or bot account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier of the account.
    pub id: i64,
    /// Whether this account is a bot.
    #[serde(default)]
    pub is_bot: bool,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Username, without the leading `@`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl User {
    /// Creates a user with just an id.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

/// The chat a message belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Chat {
    /// Unique identifier of the chat.
    pub id: i64,
    /// Chat type ("private", "group", "supergroup", "channel").
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Title, for groups and channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

// ============================================================================
// Message
// ============================================================================

/// A message, also used for edited messages and channel posts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier inside the chat.
    pub message_id: i64,
    /// Sender. Absent for channel posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    /// Chat the message was sent to.
    #[serde(default)]
    pub chat: Chat,
    /// Unix timestamp.
    #[serde(default)]
    pub date: i64,
    /// Text of a text message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Caption of a media message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Message {
    /// Creates a text message without a sender.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Creates a media message carrying only a caption.
    pub fn with_caption(caption: impl Into<String>) -> Self {
        Self {
            caption: Some(caption.into()),
            ..Default::default()
        }
    }

    /// Sets the sender.
    pub fn sent_by(mut self, user: User) -> Self {
        self.from = Some(user);
        self
    }

    /// Returns the text, falling back to the caption when the text is empty.
    ///
    /// Returns `""` when neither is present.
    pub fn text_or_caption(&self) -> &str {
        match self.text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => self.caption.as_deref().unwrap_or_default(),
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

/// A press on an inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallbackQuery {
    /// Query identifier.
    #[serde(default)]
    pub id: String,
    /// The user who pressed the button.
    pub from: User,
    /// Data attached to the button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// The message the button was attached to, if still available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Box<Message>>,
}

/// An incoming inline query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InlineQuery {
    /// Query identifier.
    #[serde(default)]
    pub id: String,
    /// The user who typed the query.
    pub from: User,
    /// Text of the query.
    #[serde(default)]
    pub query: String,
    /// Pagination offset.
    #[serde(default)]
    pub offset: String,
}

/// An inline result the user picked.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChosenInlineResult {
    /// Identifier of the chosen result.
    pub result_id: String,
    /// The user who chose the result.
    pub from: User,
    /// Query that produced the result.
    #[serde(default)]
    pub query: String,
}
