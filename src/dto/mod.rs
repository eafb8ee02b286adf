//! DTOs de la API
//!
//! Requests validados y responses serializables por dominio.

pub mod auth_dto;
pub mod location_dto;
pub mod message_dto;
pub mod reservation_dto;
pub mod review_dto;
pub mod transaction_dto;
pub mod vehicle_dto;

use serde::Serialize;

/// Envoltorio estándar de respuesta de la API
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}
