use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::review_dto::{CreateReviewRequest, ModerateReviewRequest, ReviewResponse};
use crate::middleware::auth::{auth_middleware, staff_only_middleware, AuthenticatedUser};
use crate::services::review_service::ReviewService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_review_router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/vehicle/:id", get(vehicle_reviews));

    let protected = Router::new()
        .route("/", post(create_review))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let staff = Router::new()
        .route("/pending", get(moderation_queue))
        .route("/:id/moderate", post(moderate_review))
        .layer(middleware::from_fn(staff_only_middleware))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected).merge(staff)
}

/// Valoraciones aprobadas de un vehículo
async fn vehicle_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ReviewResponse>>, AppError> {
    let service = ReviewService::new(state.pool.clone());
    let reviews = service.reviews_of(id).await?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

async fn create_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    request.validate()?;

    let service = ReviewService::new(state.pool.clone());
    let review = service
        .add_review(
            request.vehicle_id,
            user.user_id,
            request.rating,
            &request.comment,
        )
        .await?;
    Ok(Json(ReviewResponse::from(review)))
}

/// Cola de valoraciones sin aprobar (staff)
async fn moderation_queue(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewResponse>>, AppError> {
    let service = ReviewService::new(state.pool.clone());
    let reviews = service.moderation_queue().await?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

async fn moderate_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ModerateReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    let service = ReviewService::new(state.pool.clone());
    let review = service.moderate(id, request.approved).await?;
    Ok(Json(ReviewResponse::from(review)))
}
