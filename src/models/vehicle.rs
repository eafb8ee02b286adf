//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus estados de moderación.
//! Los flags `is_sold` / `is_reserved` / `is_rented` forman el ledger de
//! disponibilidad: solo se mutan dentro de una transacción con el row
//! bloqueado (`SELECT ... FOR UPDATE`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado de moderación de un anuncio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ModerationStatus::Pending),
            "approved" => Some(ModerationStatus::Approved),
            "rejected" => Some(ModerationStatus::Rejected),
            _ => None,
        }
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: Decimal,
    pub mileage: i32,
    pub color: String,
    pub condition: String,
    pub description: String,
    pub moderation_status: String,
    pub moderation_reason: String,
    pub is_sold: bool,
    pub is_reserved: bool,
    pub is_rented: bool,
    pub location: String,
    pub fuel_level: i16,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Un anuncio solo es transaccionable si está aprobado
    pub fn is_approved(&self) -> bool {
        self.moderation_status == ModerationStatus::Approved.as_str()
    }
}
