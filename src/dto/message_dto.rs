//! DTOs de mensajería

use crate::models::message::{Conversation, Message};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request de envío de mensaje
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub recipient_id: Uuid,
    pub vehicle_id: Option<Uuid>,

    #[validate(length(max = 500))]
    pub subject: String,

    #[validate(
        length(min = 1, max = 10000),
        custom = "crate::utils::validation::validate_not_empty"
    )]
    pub body: String,
}

/// Response de conversación
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: String,
    pub participant_a: String,
    pub participant_b: String,
    pub vehicle_id: Option<String>,
    pub is_support: bool,
    pub updated_at: String,
}

impl From<Conversation> for ConversationResponse {
    fn from(conv: Conversation) -> Self {
        Self {
            id: conv.id.to_string(),
            participant_a: conv.participant_a.to_string(),
            participant_b: conv.participant_b.to_string(),
            vehicle_id: conv.vehicle_id.map(|v| v.to_string()),
            is_support: conv.is_support,
            updated_at: conv.updated_at.to_rfc3339(),
        }
    }
}

/// Response de mensaje
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub subject: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<Message> for MessageResponse {
    fn from(msg: Message) -> Self {
        Self {
            id: msg.id.to_string(),
            conversation_id: msg.conversation_id.to_string(),
            sender_id: msg.sender_id.to_string(),
            recipient_id: msg.recipient_id.to_string(),
            subject: msg.subject,
            body: msg.body,
            is_read: msg.is_read,
            created_at: msg.created_at.to_rfc3339(),
        }
    }
}
