use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::dto::transaction_dto::{
    CreatePurchaseRequest, PurchaseRequestResponse, TransactionResponse,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::notification::NotificationKind;
use crate::services::notification_service::NotificationService;
use crate::services::transaction_service::TransactionService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_transaction_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_purchase_request))
        .route("/:id/cancel", post(cancel_purchase_request))
        .route("/:id/refuse", post(refuse_purchase_request))
        .route("/:id/confirm", post(confirm_sale))
        .route("/purchases", get(my_purchases))
        .route("/sales", get(my_sales))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_purchase_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreatePurchaseRequest>,
) -> Result<Json<PurchaseRequestResponse>, AppError> {
    let service = TransactionService::new(state.pool.clone(), state.reservation_ttl_hours());
    let result = service
        .create_purchase_request(request.vehicle_id, user.user_id)
        .await?;

    if result.created {
        let notifications = NotificationService::new(state.pool.clone());
        notifications
            .notify(
                &[result.transaction.seller_id],
                NotificationKind::PurchaseRequest,
                "Nueva demanda de compra",
                &format!("{} quiere comprar tu vehículo", user.username),
                &format!("/vehicles/{}", result.transaction.vehicle_id),
            )
            .await?;
    }

    Ok(Json(PurchaseRequestResponse {
        transaction: TransactionResponse::from(result.transaction),
        created: result.created,
    }))
}

async fn cancel_purchase_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, AppError> {
    let service = TransactionService::new(state.pool.clone(), state.reservation_ttl_hours());
    let trx = service.cancel_purchase_request(id, user.user_id).await?;

    let notifications = NotificationService::new(state.pool.clone());
    notifications
        .notify(
            &[trx.seller_id],
            NotificationKind::PurchaseRequest,
            "Demanda de compra anulada",
            &format!("{} anuló su demanda de compra", user.username),
            &format!("/vehicles/{}", trx.vehicle_id),
        )
        .await?;

    Ok(Json(TransactionResponse::from(trx)))
}

async fn refuse_purchase_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, AppError> {
    let service = TransactionService::new(state.pool.clone(), state.reservation_ttl_hours());
    let trx = service.refuse_purchase_request(id, user.user_id).await?;

    let notifications = NotificationService::new(state.pool.clone());
    notifications
        .notify(
            &[trx.buyer_id],
            NotificationKind::PurchaseRequest,
            "Demanda de compra rechazada",
            "El vendedor rechazó tu demanda de compra",
            &format!("/vehicles/{}", trx.vehicle_id),
        )
        .await?;

    Ok(Json(TransactionResponse::from(trx)))
}

async fn confirm_sale(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, AppError> {
    let service = TransactionService::new(state.pool.clone(), state.reservation_ttl_hours());
    let trx = service.confirm_sale(id, user.user_id).await?;

    let notifications = NotificationService::new(state.pool.clone());
    notifications
        .notify(
            &[trx.buyer_id],
            NotificationKind::SaleConfirmed,
            "Venta confirmada",
            "El vendedor confirmó tu compra",
            &format!("/vehicles/{}", trx.vehicle_id),
        )
        .await?;

    Ok(Json(TransactionResponse::from(trx)))
}

async fn my_purchases(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    let service = TransactionService::new(state.pool.clone(), state.reservation_ttl_hours());
    let purchases = service.purchases_of(user.user_id).await?;
    Ok(Json(
        purchases.into_iter().map(TransactionResponse::from).collect(),
    ))
}

async fn my_sales(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    let service = TransactionService::new(state.pool.clone(), state.reservation_ttl_hours());
    let sales = service.sales_of(user.user_id).await?;
    Ok(Json(
        sales.into_iter().map(TransactionResponse::from).collect(),
    ))
}
