//! Servicio de autenticación
//!
//! Registro y login. Capa fina: la sesión es el propio JWT, sin estado
//! en el servidor.

use crate::models::user::User;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};
use sqlx::PgPool;

/// Resultado del login: el usuario y su token
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: User,
    pub token: String,
}

pub struct AuthService {
    repository: UserRepository,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: JwtConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            jwt,
        }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        if self
            .repository
            .username_or_email_exists(username, email)
            .await?
        {
            return Err(AppError::Conflict(
                "Usuario o email ya registrado".to_string(),
            ));
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hasheando password: {}", e)))?;

        self.repository
            .create(username.to_string(), email.to_string(), password_hash)
            .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AppError> {
        let user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verificando password: {}", e)))?;

        if !valid {
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        let token = generate_token(user.id, &user.username, user.is_staff, &self.jwt)?;

        Ok(LoginResult { user, token })
    }
}
