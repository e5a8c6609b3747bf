//! Updates and the extraction convention filters rely on.
//!
//! An [`Update`] carries exactly one payload, modelled as the [`UpdateKind`]
//! enum. Filters never inspect the kinds directly; they go through the
//! extraction functions in this module:
//!
//! - [`extract_update`] - the populated payload, borrowed as a [`Payload`]
//! - [`extract_update_text`] - the text a filter compares against
//! - [`extract_sender_id`] - the id of the user who produced the update
//!
//! None of them can fail. A missing text is `""` and a missing sender is
//! `None`, so comparisons simply do not match.
//!
//! # Wire Format
//!
//! Updates decode from the platform JSON, an object holding `update_id` and
//! one payload key:
//!
//! ```json
//! { "update_id": 7, "message": { "message_id": 1, "text": "/start" } }
//! ```
//!
//! Payload keys this crate does not model decode to [`UpdateKind::Unknown`]
//! instead of failing.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::types::{CallbackQuery, ChosenInlineResult, InlineQuery, Message};

// ============================================================================
// Update
// ============================================================================

/// The payload of an [`Update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateKind {
    /// A new incoming message.
    Message(Message),
    /// A new version of a known message.
    EditedMessage(Message),
    /// A new channel post.
    ChannelPost(Message),
    /// A new version of a known channel post.
    EditedChannelPost(Message),
    /// An inline query.
    InlineQuery(InlineQuery),
    /// A chosen inline result.
    ChosenInlineResult(ChosenInlineResult),
    /// A callback query from an inline keyboard.
    CallbackQuery(CallbackQuery),
    /// A payload this crate does not model.
    Unknown,
}

impl UpdateKind {
    /// Returns the wire name of this kind (e.g. `"callback_query"`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::EditedMessage(_) => "edited_message",
            Self::ChannelPost(_) => "channel_post",
            Self::EditedChannelPost(_) => "edited_channel_post",
            Self::InlineQuery(_) => "inline_query",
            Self::ChosenInlineResult(_) => "chosen_inline_result",
            Self::CallbackQuery(_) => "callback_query",
            Self::Unknown => "unknown",
        }
    }
}

/// One incoming event from the messaging platform.
///
/// Immutable once received; filters only ever see `&Update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawUpdate", into = "RawUpdate")]
pub struct Update {
    /// Sequential identifier assigned by the platform.
    pub update_id: i64,
    /// The single populated payload.
    pub kind: UpdateKind,
}

impl Update {
    /// Creates an update from its parts.
    pub fn new(update_id: i64, kind: UpdateKind) -> Self {
        Self { update_id, kind }
    }

    /// Wraps a message as a [`UpdateKind::Message`] update with id 0.
    pub fn message(message: Message) -> Self {
        Self::new(0, UpdateKind::Message(message))
    }

    /// Wraps a callback query with id 0.
    pub fn callback_query(query: CallbackQuery) -> Self {
        Self::new(0, UpdateKind::CallbackQuery(query))
    }

    /// Wraps an inline query with id 0.
    pub fn inline_query(query: InlineQuery) -> Self {
        Self::new(0, UpdateKind::InlineQuery(query))
    }

    /// Decodes an update from its JSON representation.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// See [`extract_update`].
    pub fn payload(&self) -> Payload<'_> {
        extract_update(self)
    }

    /// See [`extract_update_text`].
    pub fn text(&self) -> &str {
        extract_update_text(self)
    }

    /// See [`extract_sender_id`].
    pub fn sender_id(&self) -> Option<i64> {
        extract_sender_id(self)
    }
}

// ============================================================================
// Wire Representation
// ============================================================================

/// Flat JSON shape: every payload key is optional.
#[derive(Default, Serialize, Deserialize)]
struct RawUpdate {
    update_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edited_message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    channel_post: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edited_channel_post: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_query: Option<InlineQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chosen_inline_result: Option<ChosenInlineResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    callback_query: Option<CallbackQuery>,
}

impl From<RawUpdate> for Update {
    fn from(raw: RawUpdate) -> Self {
        // First populated key wins.
        let kind = if let Some(msg) = raw.message {
            UpdateKind::Message(msg)
        } else if let Some(msg) = raw.edited_message {
            UpdateKind::EditedMessage(msg)
        } else if let Some(msg) = raw.channel_post {
            UpdateKind::ChannelPost(msg)
        } else if let Some(msg) = raw.edited_channel_post {
            UpdateKind::EditedChannelPost(msg)
        } else if let Some(query) = raw.inline_query {
            UpdateKind::InlineQuery(query)
        } else if let Some(result) = raw.chosen_inline_result {
            UpdateKind::ChosenInlineResult(result)
        } else if let Some(query) = raw.callback_query {
            UpdateKind::CallbackQuery(query)
        } else {
            trace!(update_id = raw.update_id, "Update has no recognised payload");
            UpdateKind::Unknown
        };

        Update {
            update_id: raw.update_id,
            kind,
        }
    }
}

impl From<Update> for RawUpdate {
    fn from(update: Update) -> Self {
        let mut raw = RawUpdate {
            update_id: update.update_id,
            ..Default::default()
        };
        match update.kind {
            UpdateKind::Message(msg) => raw.message = Some(msg),
            UpdateKind::EditedMessage(msg) => raw.edited_message = Some(msg),
            UpdateKind::ChannelPost(msg) => raw.channel_post = Some(msg),
            UpdateKind::EditedChannelPost(msg) => raw.edited_channel_post = Some(msg),
            UpdateKind::InlineQuery(query) => raw.inline_query = Some(query),
            UpdateKind::ChosenInlineResult(result) => raw.chosen_inline_result = Some(result),
            UpdateKind::CallbackQuery(query) => raw.callback_query = Some(query),
            UpdateKind::Unknown => {}
        }
        raw
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// The populated payload of an update, borrowed.
///
/// All four message-like kinds collapse into [`Payload::Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// A message, edited message, channel post or edited channel post.
    Message(&'a Message),
    /// A callback query.
    CallbackQuery(&'a CallbackQuery),
    /// An inline query.
    InlineQuery(&'a InlineQuery),
    /// A chosen inline result.
    ChosenInlineResult(&'a ChosenInlineResult),
    /// Nothing this crate models.
    None,
}

impl<'a> Payload<'a> {
    /// Returns the message, if this is a message-like payload.
    pub fn as_message(self) -> Option<&'a Message> {
        match self {
            Payload::Message(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Returns the single populated payload of `update`.
pub fn extract_update(update: &Update) -> Payload<'_> {
    match &update.kind {
        UpdateKind::Message(msg)
        | UpdateKind::EditedMessage(msg)
        | UpdateKind::ChannelPost(msg)
        | UpdateKind::EditedChannelPost(msg) => Payload::Message(msg),
        UpdateKind::CallbackQuery(query) => Payload::CallbackQuery(query),
        UpdateKind::InlineQuery(query) => Payload::InlineQuery(query),
        UpdateKind::ChosenInlineResult(result) => Payload::ChosenInlineResult(result),
        UpdateKind::Unknown => Payload::None,
    }
}

/// Returns the text associated with `update`.
///
/// - message: the text if non-empty, else the caption, else `""`
/// - callback query: its data, `""` if absent
/// - inline query: the query string
/// - anything else: `""`
pub fn extract_update_text(update: &Update) -> &str {
    match extract_update(update) {
        Payload::Message(msg) => msg.text_or_caption(),
        Payload::CallbackQuery(query) => query.data.as_deref().unwrap_or_default(),
        Payload::InlineQuery(query) => &query.query,
        Payload::ChosenInlineResult(_) | Payload::None => "",
    }
}

/// Returns the id of the user who produced `update`.
///
/// Only messages (with a `from`) and callback queries have a resolvable
/// sender; every other kind yields `None`.
pub fn extract_sender_id(update: &Update) -> Option<i64> {
    match extract_update(update) {
        Payload::Message(msg) => msg.from.as_ref().map(|user| user.id),
        Payload::CallbackQuery(query) => Some(query.from.id),
        Payload::InlineQuery(_) | Payload::ChosenInlineResult(_) | Payload::None => None,
    }
}
