//! Modelo de Notification
//!
//! Notificaciones in-app para vendedores, compradores y staff.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de notificación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewListing,
    PurchaseRequest,
    SaleConfirmed,
    Message,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NewListing => "new_listing",
            NotificationKind::PurchaseRequest => "purchase_request",
            NotificationKind::SaleConfirmed => "sale_confirmed",
            NotificationKind::Message => "message",
        }
    }
}

/// Notification - mapea exactamente a la tabla notifications
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub url: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
