//! Middleware de autenticación JWT
//!
//! Extrae el token Bearer, lo valida y deja el usuario autenticado en las
//! extensions de la request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use uuid::Uuid;

use crate::{
    repositories::user_repository::UserRepository,
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{user_id_from_claims, validate_token, JwtConfig},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub is_staff: bool,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let jwt_config = JwtConfig::from(&state.config);
    let claims = validate_token(&token, &jwt_config)
        .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))?;
    let user_id = user_id_from_claims(&claims)?;

    // Verificar que el usuario sigue existiendo
    let repository = UserRepository::new(state.pool.clone());
    let user = repository
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    let authenticated_user = AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        is_staff: user.is_staff,
    };

    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

/// Middleware para rutas exclusivas de staff
pub async fn staff_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.is_staff {
        return Err(AppError::Forbidden(
            "Se requieren permisos de staff".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}
