//! Modelos de mensajería
//!
//! Conversaciones 1-a-1 (opcionalmente ligadas a un anuncio) y sus mensajes.
//! El par de participantes se guarda ordenado por id para que el lookup
//! de conversación sea canónico.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Conversation - mapea exactamente a la tabla conversations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub participant_a: Uuid,
    pub participant_b: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub is_support: bool,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn includes(&self, user_id: Uuid) -> bool {
        self.participant_a == user_id || self.participant_b == user_id
    }
}

/// Message - mapea exactamente a la tabla messages
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub subject: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Ordenar un par de participantes de forma canónica (menor id primero)
pub fn ordered_participants(user_a: Uuid, user_b: Uuid) -> (Uuid, Uuid) {
    if user_a < user_b {
        (user_a, user_b)
    } else {
        (user_b, user_a)
    }
}
