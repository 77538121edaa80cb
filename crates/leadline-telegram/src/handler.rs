// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update filtering and content extraction.
//!
//! Determines whether an incoming Telegram update should be processed based
//! on chat type, then extracts the content into a channel-agnostic
//! [`InboundMessage`].

use leadline_core::types::{ConversationId, InboundMessage, MessageContent};
use teloxide::prelude::*;
use teloxide::types::ChatKind;

const CHANNEL: &str = "telegram";

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Extracts text or a shared contact. Other message types yield `None`.
pub fn extract_content(msg: &Message) -> Option<MessageContent> {
    if let Some(text) = msg.text() {
        return Some(MessageContent::Text(text.to_string()));
    }
    msg.contact().map(|contact| MessageContent::Contact {
        phone: contact.phone_number.clone(),
    })
}

/// Converts a Telegram message and extracted content into an [`InboundMessage`].
pub fn to_inbound_message(msg: &Message, content: MessageContent) -> InboundMessage {
    let sender_id = msg
        .from
        .as_ref()
        .map(|u| u.id.0.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    InboundMessage {
        id: msg.id.0.to_string(),
        conversation: ConversationId(msg.chat.id.0),
        channel: CHANNEL.to_string(),
        sender_id,
        content,
        timestamp: msg.date.to_rfc3339(),
    }
}

/// Converts a button press into an [`InboundMessage`].
///
/// Presses without callback data or on messages from non-private chats
/// yield `None`.
pub fn callback_to_inbound(query: &CallbackQuery) -> Option<InboundMessage> {
    let data = query.data.clone()?;
    let chat = query.message.as_ref()?.chat();
    if !chat.is_private() {
        return None;
    }
    Some(InboundMessage {
        id: query.id.to_string(),
        conversation: ConversationId(chat.id.0),
        channel: CHANNEL.to_string(),
        sender_id: query.from.id.0.to_string(),
        content: MessageContent::Button {
            data,
            query_id: Some(query.id.to_string()),
        },
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn private_chat(user_id: u64) -> serde_json::Value {
        serde_json::json!({
            "id": user_id as i64,
            "type": "private",
            "first_name": "Test",
        })
    }

    fn sender(user_id: u64) -> serde_json::Value {
        serde_json::json!({
            "id": user_id,
            "is_bot": false,
            "first_name": "Test",
        })
    }

    /// Build a mock private chat message from JSON, matching Telegram Bot API structure.
    fn make_private_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": private_chat(user_id),
            "from": sender(user_id),
            "text": text,
        });
        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn make_contact_message(user_id: u64, phone: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 2,
            "date": 1700000000i64,
            "chat": private_chat(user_id),
            "from": sender(user_id),
            "contact": {
                "phone_number": phone,
                "first_name": "Ivan",
            },
        });
        serde_json::from_value(json).expect("failed to deserialize mock contact")
    }

    fn make_group_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": -100123i64,
                "type": "supergroup",
                "title": "Test Group",
            },
            "from": sender(user_id),
            "text": text,
        });
        serde_json::from_value(json).expect("failed to deserialize mock group message")
    }

    fn make_callback(user_id: u64, data: Option<&str>) -> CallbackQuery {
        let mut json = serde_json::json!({
            "id": "4382bfdwdsb323b2d9",
            "from": sender(user_id),
            "chat_instance": "-123",
            "message": {
                "message_id": 10,
                "date": 1700000000i64,
                "chat": private_chat(user_id),
                "from": {
                    "id": 1u64,
                    "is_bot": true,
                    "first_name": "Leadline",
                },
                "text": "Clients:",
            },
        });
        if let Some(data) = data {
            json["data"] = serde_json::Value::String(data.to_string());
        }
        serde_json::from_value(json).expect("failed to deserialize mock callback")
    }

    #[test]
    fn is_dm_private_chat() {
        assert!(is_dm(&make_private_message(12345, "hello")));
    }

    #[test]
    fn is_dm_group_chat() {
        assert!(!is_dm(&make_group_message(12345, "hello")));
    }

    #[test]
    fn extract_text_content() {
        let msg = make_private_message(12345, "hello world");
        match extract_content(&msg) {
            Some(MessageContent::Text(t)) => assert_eq!(t, "hello world"),
            other => panic!("expected Some(Text), got {other:?}"),
        }
    }

    #[test]
    fn extract_contact_content() {
        let msg = make_contact_message(12345, "+79991234567");
        assert_eq!(
            extract_content(&msg),
            Some(MessageContent::Contact {
                phone: "+79991234567".into()
            })
        );
    }

    #[test]
    fn to_inbound_message_maps_fields() {
        let msg = make_private_message(12345, "hello");
        let inbound = to_inbound_message(&msg, MessageContent::Text("hello".into()));

        assert_eq!(inbound.id, "1");
        assert_eq!(inbound.channel, "telegram");
        assert_eq!(inbound.sender_id, "12345");
        assert_eq!(inbound.conversation, ConversationId(12345));
    }

    #[test]
    fn callback_maps_to_button_event() {
        let query = make_callback(12345, Some("client:5"));
        let inbound = callback_to_inbound(&query).unwrap();
        assert_eq!(inbound.conversation, ConversationId(12345));
        assert_eq!(
            inbound.content,
            MessageContent::Button {
                data: "client:5".into(),
                query_id: Some("4382bfdwdsb323b2d9".into()),
            }
        );
    }

    #[test]
    fn callback_without_data_is_ignored() {
        assert!(callback_to_inbound(&make_callback(12345, None)).is_none());
    }
}
