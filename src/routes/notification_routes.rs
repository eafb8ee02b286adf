use axum::{extract::State, middleware, routing::get, Extension, Json, Router};

use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::notification::Notification;
use crate::services::notification_service::NotificationService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_notification_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(inbox))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Bandeja del usuario; la consulta marca todo como leído
async fn inbox(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let service = NotificationService::new(state.pool.clone());
    Ok(Json(service.inbox(user.user_id).await?))
}
