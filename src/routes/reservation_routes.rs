use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::reservation_dto::{
    CreateReservationRequest, ReservationResponse, UpdateReservationStatusRequest,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::reservation::{ReservationKind, ReservationStatus};
use crate::services::reservation_service::ReservationService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_reservation_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_reservation))
        .route("/mine", get(my_reservations))
        .route("/:id/status", put(update_reservation_status))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<Json<ReservationResponse>, AppError> {
    request.validate()?;

    let kind = ReservationKind::parse(&request.kind)
        .ok_or_else(|| AppError::BadRequest(format!("Tipo de reserva inválido: {}", request.kind)))?;

    let service = ReservationService::new(state.pool.clone(), state.reservation_ttl_hours());
    let reservation = service
        .create_reservation(
            request.vehicle_id,
            user.user_id,
            request.start_at,
            request.end_at,
            kind,
            request.note.as_deref().unwrap_or(""),
            request.signature.as_deref().unwrap_or(""),
        )
        .await?;

    Ok(Json(ReservationResponse::from(reservation)))
}

async fn update_reservation_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateReservationStatusRequest>,
) -> Result<Json<ReservationResponse>, AppError> {
    request.validate()?;

    let status = ReservationStatus::parse(&request.status)
        .ok_or_else(|| AppError::BadRequest(format!("Estado inválido: {}", request.status)))?;

    let service = ReservationService::new(state.pool.clone(), state.reservation_ttl_hours());
    let reservation = service.update_status(id, user.user_id, status).await?;

    Ok(Json(ReservationResponse::from(reservation)))
}

async fn my_reservations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let service = ReservationService::new(state.pool.clone(), state.reservation_ttl_hours());
    let reservations = service.reservations_of(user.user_id).await?;
    Ok(Json(
        reservations
            .into_iter()
            .map(ReservationResponse::from)
            .collect(),
    ))
}
