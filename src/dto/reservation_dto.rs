//! DTOs de reservas

use crate::models::reservation::Reservation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request de creación de reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationRequest {
    pub vehicle_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,

    /// "reservation" o "trial"
    #[validate(length(min = 1, max = 20))]
    pub kind: String,

    #[validate(length(max = 2000))]
    pub note: Option<String>,

    #[validate(length(max = 4000))]
    pub signature: Option<String>,
}

/// Request de cambio de estado
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReservationStatusRequest {
    /// "accepted", "refused" o "cancelled"
    #[validate(length(min = 1, max = 20))]
    pub status: String,
}

/// Response de reserva para la API
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: String,
    pub vehicle_id: String,
    pub client_id: String,
    pub kind: String,
    pub start_at: String,
    pub end_at: String,
    pub status: String,
    pub note: String,
    pub created_at: String,
}

impl From<Reservation> for ReservationResponse {
    fn from(res: Reservation) -> Self {
        Self {
            id: res.id.to_string(),
            vehicle_id: res.vehicle_id.to_string(),
            client_id: res.client_id.to_string(),
            kind: res.kind,
            start_at: res.start_at.to_rfc3339(),
            end_at: res.end_at.to_rfc3339(),
            status: res.status,
            note: res.note,
            created_at: res.created_at.to_rfc3339(),
        }
    }
}
