use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::location_dto::RentalStatusResponse;
use crate::dto::reservation_dto::ReservationResponse;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, ModerateVehicleRequest, UpdateVehicleRequest, VehicleFilterQuery,
    VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, staff_only_middleware, AuthenticatedUser};
use crate::services::location_service::LocationService;
use crate::services::reservation_service::ReservationService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_vehicles))
        .route("/:id", get(get_vehicle))
        .route("/:id/schedule", get(vehicle_schedule))
        .route("/:id/rental-status", get(vehicle_rental_status));

    let protected = Router::new()
        .route("/", post(create_vehicle))
        .route("/mine", get(my_vehicles))
        .route("/:id", put(update_vehicle))
        .route("/:id", delete(delete_vehicle))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let staff = Router::new()
        .route("/:id/moderate", post(moderate_vehicle))
        .layer(middleware::from_fn(staff_only_middleware))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected).merge(staff)
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(query): Query<VehicleFilterQuery>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.list(query).await?))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

/// Agenda de reservas del vehículo (corre los sweepers antes de leer)
async fn vehicle_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let service = ReservationService::new(state.pool.clone(), state.reservation_ttl_hours());
    let reservations = service.schedule_of(id).await?;
    Ok(Json(
        reservations
            .into_iter()
            .map(ReservationResponse::from)
            .collect(),
    ))
}

/// Disponibilidad de alquiler del vehículo
async fn vehicle_rental_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RentalStatusResponse>, AppError> {
    let service = LocationService::new(state.pool.clone());
    let status = service.current_status(id).await?;
    Ok(Json(RentalStatusResponse::from(status)))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.create(user.user_id, request).await?))
}

async fn my_vehicles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.list_by_seller(user.user_id).await?))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.update(id, user.user_id, request).await?))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Anuncio eliminado exitosamente"
    })))
}

async fn moderate_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ModerateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    Ok(Json(controller.moderate(id, request).await?))
}
