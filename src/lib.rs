//! Marketplace de vehículos con ledger transaccional de disponibilidad
//!
//! Compra, reserva y alquiler de vehículos sobre PostgreSQL. Los flags
//! `is_sold` / `is_reserved` / `is_rented` solo se mutan bajo el lock del
//! row del vehículo (`SELECT ... FOR UPDATE`), y los sweepers de expiración
//! corren en cada entrada del dominio además del binario `expire_holds`.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
