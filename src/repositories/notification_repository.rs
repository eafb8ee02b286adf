//! Repositorio de notificaciones

use crate::models::notification::Notification;
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserta la misma notificación para varios destinatarios
    pub async fn bulk_insert(
        &self,
        user_ids: &[Uuid],
        kind: &str,
        title: &str,
        body: &str,
        url: &str,
    ) -> Result<u64, AppError> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, body, url, created_at)
            SELECT gen_random_uuid(), user_id, $2, $3, $4, $5, $6
            FROM UNNEST($1::uuid[]) AS t(user_id)
            "#,
        )
        .bind(user_ids)
        .bind(kind)
        .bind(title)
        .bind(body)
        .bind(url)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, AppError> {
        let rows = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC LIMIT 200",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND NOT is_read")
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
