use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::message_dto::{ConversationResponse, MessageResponse, SendMessageRequest};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::notification::NotificationKind;
use crate::repositories::user_repository::UserRepository;
use crate::services::messaging_service::MessagingService;
use crate::services::notification_service::NotificationService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_message_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(send_message))
        .route("/conversations", get(my_conversations))
        .route("/conversations/:id", get(read_conversation))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn send_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    request.validate()?;

    let service = MessagingService::new(state.pool.clone());
    let result = service
        .send_message(
            user.user_id,
            request.recipient_id,
            &request.subject,
            &request.body,
            request.vehicle_id,
            false,
        )
        .await?;

    let notifications = NotificationService::new(state.pool.clone());
    notifications
        .notify(
            &[request.recipient_id],
            NotificationKind::Message,
            "Nuevo mensaje",
            &format!("{} te escribió", user.username),
            &format!("/messages/conversations/{}", result.conversation.id),
        )
        .await?;

    Ok(Json(json!({
        "conversation": ConversationResponse::from(result.conversation),
        "message": MessageResponse::from(result.message),
    })))
}

async fn my_conversations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<ConversationResponse>>, AppError> {
    let service = MessagingService::new(state.pool.clone());
    let conversations = service.conversations_of(user.user_id).await?;
    Ok(Json(
        conversations
            .into_iter()
            .map(ConversationResponse::from)
            .collect(),
    ))
}

async fn read_conversation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let reader = UserRepository::new(state.pool.clone())
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    let service = MessagingService::new(state.pool.clone());
    let messages = service.read_conversation(id, &reader).await?;
    Ok(Json(
        messages.into_iter().map(MessageResponse::from).collect(),
    ))
}
