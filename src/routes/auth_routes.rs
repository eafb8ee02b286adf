use axum::{extract::State, routing::post, Json, Router};
use serde_json::json;
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest};
use crate::dto::ApiResponse;
use crate::services::auth_service::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::JwtConfig;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    request.validate()?;

    let service = AuthService::new(state.pool.clone(), JwtConfig::from(&state.config));
    let user = service
        .register(&request.username, &request.email, &request.password)
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        json!({ "user_id": user.id, "username": user.username }),
        "Usuario registrado exitosamente".to_string(),
    )))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    request.validate()?;

    let service = AuthService::new(state.pool.clone(), JwtConfig::from(&state.config));
    let result = service.login(&request.username, &request.password).await?;

    Ok(Json(LoginResponse {
        user_id: result.user.id.to_string(),
        username: result.user.username,
        is_staff: result.user.is_staff,
        token: result.token,
    }))
}
