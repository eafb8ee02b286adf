//! Modelo de Location (alquiler)
//!
//! Reserva de alquiler con rango de fechas. Misma regla de no-solape que las
//! reservas, restringida a {upcoming, active}. El sweeper promueve
//! upcoming -> active al llegar start_at y active -> completed al pasar end_at.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado de un alquiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

impl LocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationStatus::Upcoming => "upcoming",
            LocationStatus::Active => "active",
            LocationStatus::Completed => "completed",
            LocationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "upcoming" => Some(LocationStatus::Upcoming),
            "active" => Some(LocationStatus::Active),
            "completed" => Some(LocationStatus::Completed),
            "cancelled" => Some(LocationStatus::Cancelled),
            _ => None,
        }
    }

    /// upcoming y active bloquean el vehículo
    pub fn is_active(&self) -> bool {
        matches!(self, LocationStatus::Upcoming | LocationStatus::Active)
    }
}

/// Location principal - mapea exactamente a la tabla locations.
/// Kilometraje y combustible quedan en NULL hasta registrarse en la
/// entrega y la devolución.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub client_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: String,
    pub pickup_mileage: Option<i32>,
    pub pickup_fuel: Option<i16>,
    pub return_mileage: Option<i32>,
    pub return_fuel: Option<i16>,
    pub total_price: Option<Decimal>,
    pub conditions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vista compuesta de disponibilidad de alquiler para un vehículo
#[derive(Debug, Clone, Serialize)]
pub struct RentalStatus {
    pub rented: bool,
    pub active: Option<Location>,
    pub upcoming: Option<Location>,
    pub available: bool,
    pub state_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_statuses() {
        assert!(LocationStatus::Upcoming.is_active());
        assert!(LocationStatus::Active.is_active());
        assert!(!LocationStatus::Completed.is_active());
        assert!(!LocationStatus::Cancelled.is_active());
    }

    #[test]
    fn status_round_trip() {
        for status in [
            LocationStatus::Upcoming,
            LocationStatus::Active,
            LocationStatus::Completed,
            LocationStatus::Cancelled,
        ] {
            assert_eq!(LocationStatus::parse(status.as_str()), Some(status));
        }
    }
}
