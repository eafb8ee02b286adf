//! Modelo de Reservation
//!
//! Hold de corta duración sobre un vehículo (reserva o prueba de manejo).
//! Dos reservas en {pending, accepted} sobre el mismo vehículo nunca pueden
//! solapar sus intervalos [start_at, end_at).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationKind {
    Reservation,
    Trial,
}

impl ReservationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationKind::Reservation => "reservation",
            ReservationKind::Trial => "trial",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "reservation" => Some(ReservationKind::Reservation),
            "trial" => Some(ReservationKind::Trial),
            _ => None,
        }
    }
}

/// Estado de una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Accepted,
    Refused,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Accepted => "accepted",
            ReservationStatus::Refused => "refused",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ReservationStatus::Pending),
            "accepted" => Some(ReservationStatus::Accepted),
            "refused" => Some(ReservationStatus::Refused),
            "cancelled" => Some(ReservationStatus::Cancelled),
            "completed" => Some(ReservationStatus::Completed),
            _ => None,
        }
    }

    /// Solo pending y accepted bloquean el vehículo
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Accepted)
    }

    /// Transiciones que puede pedir un actor (el resto las hace el sweeper)
    pub fn is_actor_transition(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Accepted
                | ReservationStatus::Refused
                | ReservationStatus::Cancelled
        )
    }
}

/// Reservation principal - mapea exactamente a la tabla reservations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub client_id: Uuid,
    pub kind: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: String,
    pub note: String,
    pub signature: String,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        ReservationStatus::parse(&self.status)
            .map(|s| s.is_active())
            .unwrap_or(false)
            && self.end_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn active_statuses_block_the_vehicle() {
        assert!(ReservationStatus::Pending.is_active());
        assert!(ReservationStatus::Accepted.is_active());
        assert!(!ReservationStatus::Refused.is_active());
        assert!(!ReservationStatus::Completed.is_active());
    }

    #[test]
    fn actor_transitions_exclude_sweeper_states() {
        assert!(ReservationStatus::Accepted.is_actor_transition());
        assert!(ReservationStatus::Cancelled.is_actor_transition());
        assert!(!ReservationStatus::Completed.is_actor_transition());
        assert!(!ReservationStatus::Pending.is_actor_transition());
    }

    #[test]
    fn past_reservation_is_not_active() {
        let now = Utc::now();
        let res = Reservation {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            kind: "reservation".to_string(),
            start_at: now - Duration::hours(3),
            end_at: now - Duration::hours(1),
            status: "accepted".to_string(),
            note: String::new(),
            signature: String::new(),
            created_at: now - Duration::hours(4),
        };
        assert!(!res.is_active(now));
    }
}
