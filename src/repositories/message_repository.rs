//! Repositorio de mensajería

use crate::models::message::{ordered_participants, Conversation, Message};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_conversation(&self, id: Uuid) -> Result<Option<Conversation>, AppError> {
        let convo =
            sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(convo)
    }

    pub async fn list_conversations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Conversation>, AppError> {
        let rows = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT * FROM conversations
            WHERE participant_a = $1 OR participant_b = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_messages(&self, conversation_id: Uuid) -> Result<Vec<Message>, AppError> {
        let rows = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE conversation_id = $1 ORDER BY created_at",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn mark_read(&self, conversation_id: Uuid, reader_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = TRUE WHERE conversation_id = $1 AND recipient_id = $2 AND NOT is_read",
        )
        .bind(conversation_id)
        .bind(reader_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // ==================== Operaciones dentro de la transacción SQL ====================

    /// Lookup canónico (par ordenado de participantes) con creación implícita
    pub async fn get_or_create_conversation(
        conn: &mut PgConnection,
        user_a: Uuid,
        user_b: Uuid,
        vehicle_id: Option<Uuid>,
        is_support: bool,
    ) -> Result<Conversation, AppError> {
        let (a, b) = ordered_participants(user_a, user_b);

        let existing = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT * FROM conversations
            WHERE participant_a = $1 AND participant_b = $2
              AND vehicle_id IS NOT DISTINCT FROM $3
              AND is_support = $4
            "#,
        )
        .bind(a)
        .bind(b)
        .bind(vehicle_id)
        .bind(is_support)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(convo) = existing {
            return Ok(convo);
        }

        let convo = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (id, participant_a, participant_b, vehicle_id, is_support, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(a)
        .bind(b)
        .bind(vehicle_id)
        .bind(is_support)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(convo)
    }

    pub async fn insert_message(
        conn: &mut PgConnection,
        conversation_id: Uuid,
        sender_id: Uuid,
        recipient_id: Uuid,
        vehicle_id: Option<Uuid>,
        subject: &str,
        body: &str,
    ) -> Result<Message, AppError> {
        let msg = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, recipient_id, vehicle_id,
                                  subject, body, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(conversation_id)
        .bind(sender_id)
        .bind(recipient_id)
        .bind(vehicle_id)
        .bind(subject)
        .bind(body)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(msg)
    }

    pub async fn touch_conversation(
        conn: &mut PgConnection,
        conversation_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE conversations SET updated_at = $2 WHERE id = $1")
            .bind(conversation_id)
            .bind(Utc::now())
            .execute(conn)
            .await?;

        Ok(())
    }
}
