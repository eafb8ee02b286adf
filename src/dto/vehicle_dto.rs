//! DTOs de vehículos

use crate::models::vehicle::Vehicle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request para publicar un anuncio
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 2, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1900, max = 2026))]
    pub year: i32,

    pub price: Decimal,

    #[validate(range(min = 0))]
    pub mileage: i32,

    #[validate(length(min = 2, max = 20))]
    pub color: String,

    #[validate(length(min = 2, max = 20))]
    pub condition: String,

    #[validate(length(max = 4000))]
    pub description: String,

    #[validate(length(max = 120))]
    pub location: Option<String>,
}

/// Request para editar un anuncio propio
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    pub price: Option<Decimal>,

    #[validate(range(min = 0))]
    pub mileage: Option<i32>,

    #[validate(length(max = 4000))]
    pub description: Option<String>,

    #[validate(length(max = 120))]
    pub location: Option<String>,
}

/// Request de moderación (solo staff)
#[derive(Debug, Deserialize, Validate)]
pub struct ModerateVehicleRequest {
    #[validate(length(min = 1, max = 20))]
    pub status: String,

    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Filtros del listado público
#[derive(Debug, Deserialize, Default)]
pub struct VehicleFilterQuery {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub max_price: Option<Decimal>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: String,
    pub seller_id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: String,
    pub mileage: i32,
    pub color: String,
    pub condition: String,
    pub description: String,
    pub moderation_status: String,
    pub is_sold: bool,
    pub is_reserved: bool,
    pub is_rented: bool,
    pub location: String,
    pub view_count: i32,
    pub created_at: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id.to_string(),
            seller_id: vehicle.seller_id.to_string(),
            brand: vehicle.brand,
            model: vehicle.model,
            year: vehicle.year,
            price: vehicle.price.to_string(),
            mileage: vehicle.mileage,
            color: vehicle.color,
            condition: vehicle.condition,
            description: vehicle.description,
            moderation_status: vehicle.moderation_status,
            is_sold: vehicle.is_sold,
            is_reserved: vehicle.is_reserved,
            is_rented: vehicle.is_rented,
            location: vehicle.location,
            view_count: vehicle.view_count,
            created_at: vehicle.created_at.to_rfc3339(),
        }
    }
}
