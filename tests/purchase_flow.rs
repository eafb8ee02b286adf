//! Flujo completo de demandas de compra contra PostgreSQL real.
//!
//! Correr con `cargo test -- --ignored` teniendo `DATABASE_URL` configurada.

mod common;

use common::*;
use vehicle_marketplace::services::transaction_service::TransactionService;
use vehicle_marketplace::utils::errors::AppError;

const TTL: i64 = 24;

#[tokio::test]
#[ignore]
async fn purchase_request_reserves_the_vehicle() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let buyer = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = TransactionService::new(pool.clone(), TTL);
    let result = service
        .create_purchase_request(vehicle.id, buyer.id)
        .await
        .unwrap();

    assert!(result.created);
    assert_eq!(result.transaction.status, "pending");
    assert_eq!(result.transaction.final_price, vehicle.price);

    let after = fetch_vehicle(&pool, vehicle.id).await;
    assert!(after.is_reserved);
    assert!(!after.is_sold);
}

#[tokio::test]
#[ignore]
async fn duplicate_request_from_same_buyer_is_idempotent() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let buyer = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = TransactionService::new(pool.clone(), TTL);
    let first = service
        .create_purchase_request(vehicle.id, buyer.id)
        .await
        .unwrap();
    let second = service
        .create_purchase_request(vehicle.id, buyer.id)
        .await
        .unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.transaction.id, second.transaction.id);
}

#[tokio::test]
#[ignore]
async fn second_buyer_hits_already_reserved() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let buyer_a = create_user(&pool).await;
    let buyer_b = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = TransactionService::new(pool.clone(), TTL);
    service
        .create_purchase_request(vehicle.id, buyer_a.id)
        .await
        .unwrap();

    let err = service
        .create_purchase_request(vehicle.id, buyer_b.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyReserved(_)));
}

#[tokio::test]
#[ignore]
async fn cancelling_the_only_request_releases_the_vehicle() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let buyer_a = create_user(&pool).await;
    let buyer_b = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = TransactionService::new(pool.clone(), TTL);
    let request = service
        .create_purchase_request(vehicle.id, buyer_a.id)
        .await
        .unwrap();

    let cancelled = service
        .cancel_purchase_request(request.transaction.id, buyer_a.id)
        .await
        .unwrap();
    assert_eq!(cancelled.status, "cancelled");

    let released = fetch_vehicle(&pool, vehicle.id).await;
    assert!(!released.is_reserved);

    // El vehículo vuelve a estar disponible para otro comprador
    let retry = service
        .create_purchase_request(vehicle.id, buyer_b.id)
        .await
        .unwrap();
    assert!(retry.created);
}

#[tokio::test]
#[ignore]
async fn refuse_requires_the_seller() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let buyer = create_user(&pool).await;
    let intruder = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = TransactionService::new(pool.clone(), TTL);
    let request = service
        .create_purchase_request(vehicle.id, buyer.id)
        .await
        .unwrap();

    // Un tercero no ve la demanda: el lookup por actor devuelve NotFound
    let err = service
        .refuse_purchase_request(request.transaction.id, intruder.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let refused = service
        .refuse_purchase_request(request.transaction.id, seller.id)
        .await
        .unwrap();
    assert_eq!(refused.status, "cancelled");
    assert!(!fetch_vehicle(&pool, vehicle.id).await.is_reserved);
}

#[tokio::test]
#[ignore]
async fn confirm_sale_is_terminal() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let buyer = create_user(&pool).await;
    let late_buyer = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = TransactionService::new(pool.clone(), TTL);
    let request = service
        .create_purchase_request(vehicle.id, buyer.id)
        .await
        .unwrap();

    let confirmed = service
        .confirm_sale(request.transaction.id, seller.id)
        .await
        .unwrap();
    assert_eq!(confirmed.status, "confirmed");
    assert!(confirmed.confirmed_at.is_some());

    let sold = fetch_vehicle(&pool, vehicle.id).await;
    assert!(sold.is_sold);
    assert!(!sold.is_reserved);

    // Confirmar dos veces no encuentra demanda pendiente
    let err = service
        .confirm_sale(request.transaction.id, seller.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Vendido es terminal: nadie más puede demandar
    let err = service
        .create_purchase_request(vehicle.id, late_buyer.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadySold(_)));
}

#[tokio::test]
#[ignore]
async fn seller_cannot_buy_own_vehicle() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = TransactionService::new(pool.clone(), TTL);
    let err = service
        .create_purchase_request(vehicle.id, seller.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
#[ignore]
async fn unapproved_listing_is_not_purchasable() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let buyer = create_user(&pool).await;

    let vehicle = create_approved_vehicle(&pool, seller.id).await;
    vehicle_marketplace::repositories::vehicle_repository::VehicleRepository::new(pool.clone())
        .set_moderation(vehicle.id, "pending", "")
        .await
        .unwrap();

    let service = TransactionService::new(pool.clone(), TTL);
    let err = service
        .create_purchase_request(vehicle.id, buyer.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}
