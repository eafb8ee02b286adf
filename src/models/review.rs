//! Modelo de Review
//!
//! Las valoraciones nacen sin aprobar y solo se publican cuando un
//! moderador las aprueba. Reenviar una valoración vuelve a dejarla
//! pendiente de moderación.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// Review - mapea exactamente a la tabla reviews
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub author_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Valida el rango de la nota (1 a 5 estrellas)
pub fn rating_in_range(rating: i16) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}
