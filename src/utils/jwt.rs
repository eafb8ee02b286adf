//! Utilidades JWT
//!
//! Este módulo contiene funciones helper para manejo de JWT tokens.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

/// Claims del JWT token
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // user_id
    pub username: String,
    pub is_staff: bool,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at timestamp
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration: config.jwt_expiration,
        }
    }
}

/// Generar JWT token para un usuario
pub fn generate_token(
    user_id: Uuid,
    username: &str,
    is_staff: bool,
    config: &JwtConfig,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.expiration as i64);

    let claims = JwtClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        is_staff,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))
}

/// Validar y decodificar un JWT token
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());
    let validation = Validation::default();

    decode::<JwtClaims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))
}

/// Extraer el user_id de los claims
pub fn user_id_from_claims(claims: &JwtClaims) -> Result<Uuid, AppError> {
    Uuid::parse_str(&claims.sub).map_err(|e| AppError::Jwt(format!("sub inválido: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        }
    }

    #[test]
    fn round_trip_token() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let token = generate_token(user_id, "alice", false, &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(user_id_from_claims(&claims).unwrap(), user_id);
        assert!(!claims.is_staff);
    }

    #[test]
    fn rejects_token_with_wrong_secret() {
        let config = test_config();
        let other = JwtConfig {
            secret: "other-secret".to_string(),
            expiration: 3600,
        };
        let token = generate_token(Uuid::new_v4(), "alice", false, &config).unwrap();
        assert!(validate_token(&token, &other).is_err());
    }
}
