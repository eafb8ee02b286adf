//! Repositorios de acceso a datos
//!
//! Este módulo contiene la capa de queries sqlx por entidad. Las operaciones
//! que forman parte de una sección crítica reciben `&mut PgConnection` de la
//! transacción abierta por el servicio.

pub mod favorite_repository;
pub mod location_repository;
pub mod message_repository;
pub mod notification_repository;
pub mod reservation_repository;
pub mod review_repository;
pub mod transaction_repository;
pub mod user_repository;
pub mod vehicle_repository;
