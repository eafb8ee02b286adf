//! Configuración del sistema
//!
//! Este módulo contiene la configuración del entorno y de la base de datos.

pub mod environment;
