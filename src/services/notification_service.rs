//! Servicio de notificaciones
//!
//! Helper de notificación masiva usado por los flujos de compra, moderación
//! y mensajería.

use crate::models::notification::{Notification, NotificationKind};
use crate::repositories::notification_repository::NotificationRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct NotificationService {
    repository: NotificationRepository,
    users: UserRepository,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: NotificationRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    /// Notifica a un conjunto de usuarios (deduplicados)
    pub async fn notify(
        &self,
        user_ids: &[Uuid],
        kind: NotificationKind,
        title: &str,
        body: &str,
        url: &str,
    ) -> Result<u64, AppError> {
        let mut unique: Vec<Uuid> = user_ids.to_vec();
        unique.sort();
        unique.dedup();

        self.repository
            .bulk_insert(&unique, kind.as_str(), title, body, url)
            .await
    }

    /// Notifica a todos los moderadores
    pub async fn notify_staff(
        &self,
        kind: NotificationKind,
        title: &str,
        body: &str,
        url: &str,
    ) -> Result<u64, AppError> {
        let staff = self.users.staff_ids().await?;
        self.repository
            .bulk_insert(&staff, kind.as_str(), title, body, url)
            .await
    }

    /// Bandeja del usuario; marca todas como leídas al consultarla
    pub async fn inbox(&self, user_id: Uuid) -> Result<Vec<Notification>, AppError> {
        let items = self.repository.list_for_user(user_id).await?;
        self.repository.mark_all_read(user_id).await?;
        Ok(items)
    }
}
