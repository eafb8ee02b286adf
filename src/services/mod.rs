//! Services module
//!
//! Este módulo contiene la lógica de negocio y servicios de la aplicación.
//! Las máquinas de estado (compra, reserva, alquiler) y sus sweepers viven
//! acá; cada operación serializa el acceso al vehículo con un lock de row.

pub mod auth_service;
pub mod favorite_service;
pub mod location_service;
pub mod messaging_service;
pub mod notification_service;
pub mod reservation_service;
pub mod review_service;
pub mod transaction_service;
