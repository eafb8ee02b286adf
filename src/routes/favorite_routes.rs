use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::dto::vehicle_dto::VehicleResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::services::favorite_service::FavoriteService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_favorite_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:vehicle_id/toggle", post(toggle_favorite))
        .route("/mine", get(my_favorites))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Marca o desmarca el anuncio como favorito del usuario
async fn toggle_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let service = FavoriteService::new(state.pool.clone());
    let favorited = service.toggle(user.user_id, vehicle_id).await?;
    Ok(Json(serde_json::json!({
        "vehicle_id": vehicle_id,
        "favorited": favorited,
    })))
}

async fn my_favorites(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let service = FavoriteService::new(state.pool.clone());
    let vehicles = service.my_favorites(user.user_id).await?;
    Ok(Json(
        vehicles.into_iter().map(VehicleResponse::from).collect(),
    ))
}
