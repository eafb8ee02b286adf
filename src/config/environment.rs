//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// TTL por defecto (en horas) para demandas de compra y reservas pendientes
pub const DEFAULT_RESERVATION_TTL_HOURS: i64 = 24;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    /// TTL en horas para holds pendientes; el sweeper lo recibe explícitamente
    pub reservation_ttl_hours: i64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expiration: env::var("JWT_EXPIRATION")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .expect("JWT_EXPIRATION must be a valid number"),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            reservation_ttl_hours: parse_ttl_hours(env::var("RESERVATION_TTL_HOURS").ok()),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parsear el TTL con fallback al default y mínimo de 1 hora
pub fn parse_ttl_hours(raw: Option<String>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_RESERVATION_TTL_HOURS)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_defaults_to_24_hours() {
        assert_eq!(parse_ttl_hours(None), 24);
        assert_eq!(parse_ttl_hours(Some("no-number".to_string())), 24);
    }

    #[test]
    fn ttl_is_clamped_to_at_least_one_hour() {
        assert_eq!(parse_ttl_hours(Some("0".to_string())), 1);
        assert_eq!(parse_ttl_hours(Some("-5".to_string())), 1);
        assert_eq!(parse_ttl_hours(Some("48".to_string())), 48);
    }
}
