//! Sweepers de expiración por TTL: barrido en bloque e idempotencia.

mod common;

use chrono::{Duration, Utc};
use common::*;
use vehicle_marketplace::models::reservation::ReservationKind;
use vehicle_marketplace::services::location_service::LocationService;
use vehicle_marketplace::services::reservation_service::ReservationService;
use vehicle_marketplace::services::transaction_service::TransactionService;

const TTL: i64 = 24;

#[tokio::test]
#[ignore]
async fn stale_purchase_request_is_cancelled_and_vehicle_released() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let buyer = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = TransactionService::new(pool.clone(), TTL);
    let request = service
        .create_purchase_request(vehicle.id, buyer.id)
        .await
        .unwrap();

    // 25 horas de antigüedad con TTL de 24
    age_transaction(&pool, request.transaction.id, 25).await;

    let expired = service
        .expire_stale_purchase_requests(Some(TTL))
        .await
        .unwrap();
    assert!(expired >= 1);

    let after = fetch_vehicle(&pool, vehicle.id).await;
    assert!(!after.is_reserved);

    let trx = sqlx::query_scalar::<_, String>("SELECT status FROM transactions WHERE id = $1")
        .bind(request.transaction.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(trx, "cancelled");
}

#[tokio::test]
#[ignore]
async fn fresh_purchase_request_survives_the_sweep() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let buyer = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = TransactionService::new(pool.clone(), TTL);
    let request = service
        .create_purchase_request(vehicle.id, buyer.id)
        .await
        .unwrap();

    // 23 horas: todavía dentro del TTL
    age_transaction(&pool, request.transaction.id, 23).await;

    service
        .expire_stale_purchase_requests(Some(TTL))
        .await
        .unwrap();

    let trx = sqlx::query_scalar::<_, String>("SELECT status FROM transactions WHERE id = $1")
        .bind(request.transaction.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(trx, "pending");
    assert!(fetch_vehicle(&pool, vehicle.id).await.is_reserved);
}

#[tokio::test]
#[ignore]
async fn ttl_override_narrows_the_window() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let buyer = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = TransactionService::new(pool.clone(), TTL);
    let request = service
        .create_purchase_request(vehicle.id, buyer.id)
        .await
        .unwrap();

    age_transaction(&pool, request.transaction.id, 2).await;

    // Con TTL de 1 hora la demanda de 2 horas ya está vencida
    let expired = service
        .expire_stale_purchase_requests(Some(1))
        .await
        .unwrap();
    assert!(expired >= 1);
    assert!(!fetch_vehicle(&pool, vehicle.id).await.is_reserved);
}

#[tokio::test]
#[ignore]
async fn stale_pending_reservation_is_swept() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let client = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = ReservationService::new(pool.clone(), TTL);
    let start = Utc::now() + Duration::days(7);
    let reservation = service
        .create_reservation(
            vehicle.id,
            client.id,
            start,
            start + Duration::hours(1),
            ReservationKind::Reservation,
            "",
            "",
        )
        .await
        .unwrap();

    age_reservation(&pool, reservation.id, 25).await;

    let cancelled = service
        .expire_stale_pending_reservations(Some(TTL))
        .await
        .unwrap();
    assert!(cancelled >= 1);
    assert!(!fetch_vehicle(&pool, vehicle.id).await.is_reserved);

    let status = sqlx::query_scalar::<_, String>("SELECT status FROM reservations WHERE id = $1")
        .bind(reservation.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "cancelled");
}

#[tokio::test]
#[ignore]
async fn finished_reservation_completes_and_releases() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let client = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = ReservationService::new(pool.clone(), TTL);
    let start = Utc::now() + Duration::hours(1);
    let reservation = service
        .create_reservation(
            vehicle.id,
            client.id,
            start,
            start + Duration::hours(2),
            ReservationKind::Trial,
            "",
            "",
        )
        .await
        .unwrap();

    // La franja completa quedó en el pasado
    sqlx::query(
        "UPDATE reservations SET start_at = NOW() - INTERVAL '3 hours', end_at = NOW() - INTERVAL '1 hour' WHERE id = $1",
    )
    .bind(reservation.id)
    .execute(&pool)
    .await
    .unwrap();

    let completed = service.expire_finished_reservations().await.unwrap();
    assert!(completed >= 1);
    assert!(!fetch_vehicle(&pool, vehicle.id).await.is_reserved);

    let status = sqlx::query_scalar::<_, String>("SELECT status FROM reservations WHERE id = $1")
        .bind(reservation.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "completed");
}

// Los sweepers son idempotentes: una segunda pasada inmediata no encuentra
// nada que barrer y no vuelve a tocar el ledger.

#[tokio::test]
#[ignore]
async fn second_purchase_sweep_finds_nothing() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let buyer = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = TransactionService::new(pool.clone(), TTL);
    let request = service
        .create_purchase_request(vehicle.id, buyer.id)
        .await
        .unwrap();
    age_transaction(&pool, request.transaction.id, 25).await;

    let first = service
        .expire_stale_purchase_requests(Some(TTL))
        .await
        .unwrap();
    assert!(first >= 1);

    let second = service
        .expire_stale_purchase_requests(Some(TTL))
        .await
        .unwrap();
    assert_eq!(second, 0);

    // El ledger queda estable tras la segunda pasada
    let after = fetch_vehicle(&pool, vehicle.id).await;
    assert!(!after.is_reserved);
    let status = sqlx::query_scalar::<_, String>("SELECT status FROM transactions WHERE id = $1")
        .bind(request.transaction.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "cancelled");
}

#[tokio::test]
#[ignore]
async fn second_stale_reservation_sweep_finds_nothing() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let client = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = ReservationService::new(pool.clone(), TTL);
    let start = Utc::now() + Duration::days(7);
    let reservation = service
        .create_reservation(
            vehicle.id,
            client.id,
            start,
            start + Duration::hours(1),
            ReservationKind::Reservation,
            "",
            "",
        )
        .await
        .unwrap();
    age_reservation(&pool, reservation.id, 25).await;

    let first = service
        .expire_stale_pending_reservations(Some(TTL))
        .await
        .unwrap();
    assert!(first >= 1);

    let second = service
        .expire_stale_pending_reservations(Some(TTL))
        .await
        .unwrap();
    assert_eq!(second, 0);
    assert!(!fetch_vehicle(&pool, vehicle.id).await.is_reserved);
}

#[tokio::test]
#[ignore]
async fn second_finished_reservation_sweep_finds_nothing() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let client = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = ReservationService::new(pool.clone(), TTL);
    let start = Utc::now() + Duration::hours(1);
    let reservation = service
        .create_reservation(
            vehicle.id,
            client.id,
            start,
            start + Duration::hours(2),
            ReservationKind::Trial,
            "",
            "",
        )
        .await
        .unwrap();

    sqlx::query(
        "UPDATE reservations SET start_at = NOW() - INTERVAL '3 hours', end_at = NOW() - INTERVAL '1 hour' WHERE id = $1",
    )
    .bind(reservation.id)
    .execute(&pool)
    .await
    .unwrap();

    let first = service.expire_finished_reservations().await.unwrap();
    assert!(first >= 1);

    let second = service.expire_finished_reservations().await.unwrap();
    assert_eq!(second, 0);
    assert!(!fetch_vehicle(&pool, vehicle.id).await.is_reserved);
}

#[tokio::test]
#[ignore]
async fn second_rental_sweeps_find_nothing() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let client = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = LocationService::new(pool.clone());
    let start = Utc::now() + Duration::hours(1);
    let location = service
        .create_location(
            vehicle.id,
            client.id,
            start,
            start + Duration::hours(5),
            None,
            "",
        )
        .await
        .unwrap();

    // El alquiler ya debería haber arrancado
    sqlx::query("UPDATE locations SET start_at = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(location.id)
        .execute(&pool)
        .await
        .unwrap();

    let started = service.start_due_locations().await.unwrap();
    assert!(started >= 1);
    assert_eq!(service.start_due_locations().await.unwrap(), 0);

    // Y ahora ya terminó
    finish_location(&pool, location.id).await;

    let completed = service.expire_finished_locations().await.unwrap();
    assert!(completed >= 1);
    assert_eq!(service.expire_finished_locations().await.unwrap(), 0);

    let after = fetch_vehicle(&pool, vehicle.id).await;
    assert!(!after.is_rented);
    assert!(!after.is_reserved);
}
