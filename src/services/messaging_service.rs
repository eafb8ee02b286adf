//! Servicio de mensajería
//!
//! Conversaciones 1-a-1 con lookup canónico (par de participantes ordenado
//! por id) y envío de mensajes ligados opcionalmente a un anuncio.

use crate::models::message::{Conversation, Message};
use crate::models::user::User;
use crate::repositories::message_repository::MessageRepository;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Resultado del envío: la conversación (creada o reutilizada) y el mensaje
#[derive(Debug, Clone)]
pub struct SendMessageResult {
    pub conversation: Conversation,
    pub message: Message,
}

pub struct MessagingService {
    pool: PgPool,
    repository: MessageRepository,
}

impl MessagingService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: MessageRepository::new(pool.clone()),
            pool,
        }
    }

    /// Envía un mensaje creando la conversación si no existe todavía.
    /// El bump de `updated_at` va en la misma transacción que el insert.
    pub async fn send_message(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        subject: &str,
        body: &str,
        vehicle_id: Option<Uuid>,
        is_support: bool,
    ) -> Result<SendMessageResult, AppError> {
        let subject = subject.trim();
        let body = body.trim();

        if body.is_empty() {
            return Err(AppError::BadRequest("Mensaje vacío".to_string()));
        }
        if subject.is_empty() {
            return Err(AppError::BadRequest("Asunto vacío".to_string()));
        }
        if sender_id == recipient_id {
            return Err(AppError::BadRequest(
                "No puedes enviarte mensajes a ti mismo".to_string(),
            ));
        }

        let subject: String = subject.chars().take(200).collect();

        let mut tx = self.pool.begin().await?;

        let conversation = MessageRepository::get_or_create_conversation(
            &mut *tx,
            sender_id,
            recipient_id,
            vehicle_id,
            is_support,
        )
        .await?;

        let message = MessageRepository::insert_message(
            &mut *tx,
            conversation.id,
            sender_id,
            recipient_id,
            vehicle_id,
            &subject,
            body,
        )
        .await?;

        MessageRepository::touch_conversation(&mut *tx, conversation.id).await?;

        tx.commit().await?;

        log::info!(
            "💬 Mensaje enviado en conversación {} ({} -> {})",
            conversation.id,
            sender_id,
            recipient_id
        );

        Ok(SendMessageResult {
            conversation,
            message,
        })
    }

    /// ¿Puede el usuario ver esta conversación? El staff siempre puede.
    pub fn user_can_access(&self, conversation: &Conversation, user: &User) -> bool {
        user.is_staff || conversation.includes(user.id)
    }

    pub async fn conversations_of(&self, user_id: Uuid) -> Result<Vec<Conversation>, AppError> {
        self.repository.list_conversations_for_user(user_id).await
    }

    /// Mensajes de una conversación; marca como leídos los dirigidos al lector
    pub async fn read_conversation(
        &self,
        conversation_id: Uuid,
        reader: &User,
    ) -> Result<Vec<Message>, AppError> {
        let conversation = self
            .repository
            .find_conversation(conversation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conversación no encontrada".to_string()))?;

        if !self.user_can_access(&conversation, reader) {
            return Err(AppError::Forbidden(
                "No participas en esta conversación".to_string(),
            ));
        }

        self.repository.mark_read(conversation_id, reader.id).await?;
        self.repository.list_messages(conversation_id).await
    }
}
