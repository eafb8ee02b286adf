//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod location;
pub mod message;
pub mod notification;
pub mod reservation;
pub mod review;
pub mod transaction;
pub mod user;
pub mod vehicle;
