// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for inbound events.

use aco_core::InboundEvent;

/// A message from `author_id` in `channel_id` of group destination `destination_id`.
pub fn group_event(
    author_id: &str,
    destination_id: &str,
    channel_id: &str,
    text: &str,
) -> InboundEvent {
    InboundEvent {
        id: format!("evt-{}", uuid::Uuid::new_v4()),
        author_id: author_id.to_string(),
        is_bot_author: false,
        destination_id: Some(destination_id.to_string()),
        channel_id: channel_id.to_string(),
        text: text.to_string(),
    }
}

/// A message from `author_id` in their private channel with the bot.
pub fn private_event(author_id: &str, text: &str) -> InboundEvent {
    InboundEvent {
        id: format!("evt-{}", uuid::Uuid::new_v4()),
        author_id: author_id.to_string(),
        is_bot_author: false,
        destination_id: None,
        channel_id: format!("dm-{author_id}"),
        text: text.to_string(),
    }
}
