//! Helpers compartidos de los tests de integración
#![allow(dead_code)]
//!
//! Requieren una base PostgreSQL accesible vía `DATABASE_URL`. Cada helper
//! genera datos únicos para que los tests puedan correr en paralelo sobre
//! la misma base.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use vehicle_marketplace::database::{create_pool, run_migrations};
use vehicle_marketplace::models::user::User;
use vehicle_marketplace::models::vehicle::Vehicle;
use vehicle_marketplace::repositories::user_repository::UserRepository;
use vehicle_marketplace::repositories::vehicle_repository::VehicleRepository;

pub async fn setup_pool() -> PgPool {
    let pool = create_pool(None).await.expect("DATABASE_URL accesible");
    run_migrations(&pool).await.expect("migraciones aplicadas");
    pool
}

pub async fn create_user(pool: &PgPool) -> User {
    let suffix = Uuid::new_v4().simple().to_string();
    UserRepository::new(pool.clone())
        .create(
            format!("user_{}", &suffix[..12]),
            format!("{}@test.local", &suffix[..12]),
            "not-a-real-hash".to_string(),
        )
        .await
        .expect("usuario creado")
}

pub async fn create_approved_vehicle(pool: &PgPool, seller_id: Uuid) -> Vehicle {
    let repository = VehicleRepository::new(pool.clone());
    let vehicle = repository
        .create(
            seller_id,
            "Renault".to_string(),
            "Clio".to_string(),
            2019,
            Decimal::new(12_500_00, 2),
            42_000,
            "azul".to_string(),
            "usado".to_string(),
            "Bien mantenido".to_string(),
            "Madrid".to_string(),
        )
        .await
        .expect("vehículo creado");

    repository
        .set_moderation(vehicle.id, "approved", "")
        .await
        .expect("anuncio aprobado")
}

pub async fn fetch_vehicle(pool: &PgPool, id: Uuid) -> Vehicle {
    VehicleRepository::new(pool.clone())
        .find_by_id(id)
        .await
        .expect("query ok")
        .expect("vehículo existe")
}

/// Retrocede el `created_at` de una transacción para simular holds viejos
pub async fn age_transaction(pool: &PgPool, transaction_id: Uuid, hours: i64) {
    sqlx::query(
        "UPDATE transactions SET created_at = created_at - ($2::int * INTERVAL '1 hour') WHERE id = $1",
    )
    .bind(transaction_id)
    .bind(hours)
    .execute(pool)
    .await
    .expect("created_at retrocedido");
}

/// Retrocede el `created_at` de una reserva
pub async fn age_reservation(pool: &PgPool, reservation_id: Uuid, hours: i64) {
    sqlx::query(
        "UPDATE reservations SET created_at = created_at - ($2::int * INTERVAL '1 hour') WHERE id = $1",
    )
    .bind(reservation_id)
    .bind(hours)
    .execute(pool)
    .await
    .expect("created_at retrocedido");
}

/// Fuerza el fin de un alquiler al pasado
pub async fn finish_location(pool: &PgPool, location_id: Uuid) {
    sqlx::query(
        "UPDATE locations SET start_at = NOW() - INTERVAL '3 hours', end_at = NOW() - INTERVAL '1 hour' WHERE id = $1",
    )
    .bind(location_id)
    .execute(pool)
    .await
    .expect("alquiler vencido");
}
