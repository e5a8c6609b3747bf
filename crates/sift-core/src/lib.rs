//! # Sift Core
//!
//! The update model shared by every sift crate.
//!
//! - **Types**: the payloads an update can carry ([`Message`],
//!   [`CallbackQuery`], [`InlineQuery`], ...)
//! - **Update**: the tagged union itself ([`Update`], [`UpdateKind`]) and its
//!   JSON wire decoding
//! - **Extraction**: the text/sender convention filters are built on
//!   ([`extract_update`], [`extract_update_text`], [`extract_sender_id`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use sift_core::Update;
//!
//! let update = Update::from_json(r#"{"update_id":1,"message":{"message_id":1,"text":"hi"}}"#)?;
//! assert_eq!(update.text(), "hi");
//! assert_eq!(update.sender_id(), None);
//! ```

pub mod types;
pub mod update;

pub use types::{CallbackQuery, Chat, ChosenInlineResult, InlineQuery, Message, User};
pub use update::{
    Payload, Update, UpdateKind, extract_sender_id, extract_update, extract_update_text,
};
