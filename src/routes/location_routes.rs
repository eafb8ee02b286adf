use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::location_dto::{CreateLocationRequest, LocationResponse, RecordReadingsRequest};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::services::location_service::LocationService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_location_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_location))
        .route("/mine", get(my_rentals))
        .route("/:id/pickup", post(record_pickup))
        .route("/:id/return", post(record_return))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_location(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<Json<LocationResponse>, AppError> {
    request.validate()?;

    let service = LocationService::new(state.pool.clone());
    let location = service
        .create_location(
            request.vehicle_id,
            user.user_id,
            request.start_at,
            request.end_at,
            None,
            request.conditions.as_deref().unwrap_or(""),
        )
        .await?;

    Ok(Json(LocationResponse::from(location)))
}

async fn record_pickup(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordReadingsRequest>,
) -> Result<Json<LocationResponse>, AppError> {
    request.validate()?;

    let service = LocationService::new(state.pool.clone());
    let location = service
        .record_pickup(id, user.user_id, request.mileage, request.fuel)
        .await?;

    Ok(Json(LocationResponse::from(location)))
}

async fn record_return(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordReadingsRequest>,
) -> Result<Json<LocationResponse>, AppError> {
    request.validate()?;

    let service = LocationService::new(state.pool.clone());
    let location = service
        .record_return(id, user.user_id, request.mileage, request.fuel)
        .await?;

    Ok(Json(LocationResponse::from(location)))
}

async fn my_rentals(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<LocationResponse>>, AppError> {
    let service = LocationService::new(state.pool.clone());
    let rentals = service.rentals_of(user.user_id).await?;
    Ok(Json(
        rentals.into_iter().map(LocationResponse::from).collect(),
    ))
}
