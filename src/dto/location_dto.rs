//! DTOs de alquileres

use crate::models::location::Location;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request de creación de alquiler
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLocationRequest {
    pub vehicle_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,

    #[validate(length(max = 4000))]
    pub conditions: Option<String>,
}

/// Request de lecturas en la entrega o la devolución
#[derive(Debug, Deserialize, Validate)]
pub struct RecordReadingsRequest {
    #[validate(range(min = 0))]
    pub mileage: i32,

    /// Porcentaje 0..=100
    pub fuel: i16,
}

/// Response de alquiler para la API
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub id: String,
    pub vehicle_id: String,
    pub client_id: String,
    pub start_at: String,
    pub end_at: String,
    pub status: String,
    pub pickup_mileage: Option<i32>,
    pub pickup_fuel: Option<i16>,
    pub return_mileage: Option<i32>,
    pub return_fuel: Option<i16>,
    pub total_price: Option<String>,
    pub conditions: String,
    pub created_at: String,
}

impl From<Location> for LocationResponse {
    fn from(loc: Location) -> Self {
        Self {
            id: loc.id.to_string(),
            vehicle_id: loc.vehicle_id.to_string(),
            client_id: loc.client_id.to_string(),
            start_at: loc.start_at.to_rfc3339(),
            end_at: loc.end_at.to_rfc3339(),
            status: loc.status,
            pickup_mileage: loc.pickup_mileage,
            pickup_fuel: loc.pickup_fuel,
            return_mileage: loc.return_mileage,
            return_fuel: loc.return_fuel,
            total_price: loc.total_price.map(|p| p.to_string()),
            conditions: loc.conditions,
            created_at: loc.created_at.to_rfc3339(),
        }
    }
}

/// Response de disponibilidad de alquiler de un vehículo
#[derive(Debug, Serialize)]
pub struct RentalStatusResponse {
    pub rented: bool,
    pub active: Option<LocationResponse>,
    pub upcoming: Option<LocationResponse>,
    pub available: bool,
    pub state_label: String,
}

impl From<crate::models::location::RentalStatus> for RentalStatusResponse {
    fn from(status: crate::models::location::RentalStatus) -> Self {
        Self {
            rented: status.rented,
            active: status.active.map(LocationResponse::from),
            upcoming: status.upcoming.map(LocationResponse::from),
            available: status.available,
            state_label: status.state_label,
        }
    }
}
