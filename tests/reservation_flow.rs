//! Flujo de reservas: solapes, standing de actores y liberación del flag.

mod common;

use chrono::{Duration, Utc};
use common::*;
use vehicle_marketplace::models::reservation::{ReservationKind, ReservationStatus};
use vehicle_marketplace::services::reservation_service::ReservationService;
use vehicle_marketplace::utils::errors::AppError;

const TTL: i64 = 24;

#[tokio::test]
#[ignore]
async fn reservation_sets_the_reserved_flag() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let client = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = ReservationService::new(pool.clone(), TTL);
    let start = Utc::now() + Duration::hours(2);
    let reservation = service
        .create_reservation(
            vehicle.id,
            client.id,
            start,
            start + Duration::hours(1),
            ReservationKind::Trial,
            "prueba de manejo",
            "",
        )
        .await
        .unwrap();

    assert_eq!(reservation.status, "pending");
    assert_eq!(reservation.kind, "trial");
    assert!(fetch_vehicle(&pool, vehicle.id).await.is_reserved);
}

#[tokio::test]
#[ignore]
async fn inverted_interval_is_rejected_without_touching_the_db() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let client = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = ReservationService::new(pool.clone(), TTL);
    let start = Utc::now() + Duration::hours(2);
    let err = service
        .create_reservation(
            vehicle.id,
            client.id,
            start,
            start - Duration::hours(1),
            ReservationKind::Reservation,
            "",
            "",
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidInterval(_)));
    assert!(!fetch_vehicle(&pool, vehicle.id).await.is_reserved);
}

#[tokio::test]
#[ignore]
async fn reserved_vehicle_rejects_second_hold() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let client_a = create_user(&pool).await;
    let client_b = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = ReservationService::new(pool.clone(), TTL);
    let start = Utc::now() + Duration::hours(2);
    service
        .create_reservation(
            vehicle.id,
            client_a.id,
            start,
            start + Duration::hours(1),
            ReservationKind::Reservation,
            "",
            "",
        )
        .await
        .unwrap();

    // El flag bloquea antes de llegar al chequeo de solape
    let err = service
        .create_reservation(
            vehicle.id,
            client_b.id,
            start + Duration::hours(5),
            start + Duration::hours(6),
            ReservationKind::Reservation,
            "",
            "",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyReserved(_)));
}

#[tokio::test]
#[ignore]
async fn cancelling_releases_the_flag_and_frees_the_slot() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let client_a = create_user(&pool).await;
    let client_b = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = ReservationService::new(pool.clone(), TTL);
    let start = Utc::now() + Duration::hours(2);
    let reservation = service
        .create_reservation(
            vehicle.id,
            client_a.id,
            start,
            start + Duration::hours(1),
            ReservationKind::Reservation,
            "",
            "",
        )
        .await
        .unwrap();

    let cancelled = service
        .update_status(reservation.id, client_a.id, ReservationStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, "cancelled");
    assert!(!fetch_vehicle(&pool, vehicle.id).await.is_reserved);

    // La misma franja vuelve a estar disponible
    service
        .create_reservation(
            vehicle.id,
            client_b.id,
            start,
            start + Duration::hours(1),
            ReservationKind::Reservation,
            "",
            "",
        )
        .await
        .unwrap();
}

#[tokio::test]
#[ignore]
async fn only_seller_or_client_can_transition() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let client = create_user(&pool).await;
    let intruder = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = ReservationService::new(pool.clone(), TTL);
    let start = Utc::now() + Duration::hours(2);
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

    let err = service
        .update_status(reservation.id, intruder.id, ReservationStatus::Accepted)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let accepted = service
        .update_status(reservation.id, seller.id, ReservationStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(accepted.status, "accepted");
    // Aceptar no libera el flag
    assert!(fetch_vehicle(&pool, vehicle.id).await.is_reserved);
}

#[tokio::test]
#[ignore]
async fn sweeper_states_are_not_actor_transitions() {
    let pool = setup_pool().await;
    let seller = create_user(&pool).await;
    let client = create_user(&pool).await;
    let vehicle = create_approved_vehicle(&pool, seller.id).await;

    let service = ReservationService::new(pool.clone(), TTL);
    let start = Utc::now() + Duration::hours(2);
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

    let err = service
        .update_status(reservation.id, client.id, ReservationStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}
