//! Acceso a la base de datos
//!
//! Este módulo contiene la construcción del pool de PostgreSQL.

pub mod connection;

pub use connection::*;
