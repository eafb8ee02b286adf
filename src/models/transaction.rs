//! Modelo de Transaction
//!
//! Demanda de compra de un vehículo. Ciclo de vida:
//! `pending -> confirmed` (solo el vendedor, terminal) o
//! `pending -> cancelled` (comprador, vendedor o sweeper TTL).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado de la transacción de compra
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Confirmed => "confirmed",
            TransactionStatus::Cancelled => "cancelled",
            TransactionStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TransactionStatus::Pending),
            "confirmed" => Some(TransactionStatus::Confirmed),
            "cancelled" => Some(TransactionStatus::Cancelled),
            "completed" => Some(TransactionStatus::Completed),
            _ => None,
        }
    }

    /// confirmed y cancelled son terminales
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Confirmed | TransactionStatus::Cancelled
        )
    }
}

/// Transaction principal - mapea exactamente a la tabla transactions.
/// `final_price` es un snapshot del precio del vehículo al momento de la demanda.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub final_price: Decimal,
    pub status: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(TransactionStatus::Confirmed.is_terminal());
        assert!(TransactionStatus::Cancelled.is_terminal());
        assert!(!TransactionStatus::Pending.is_terminal());
    }

    #[test]
    fn status_round_trip() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Confirmed,
            TransactionStatus::Cancelled,
            TransactionStatus::Completed,
        ] {
            assert_eq!(TransactionStatus::parse(status.as_str()), Some(status));
        }
    }
}
