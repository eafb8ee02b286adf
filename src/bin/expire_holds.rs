//! Barrido de expiración para cron
//!
//! Ejecuta los cinco sweepers del dominio en un solo proceso: demandas de
//! compra vencidas, reservas terminadas, reservas pendientes viejas,
//! alquileres por arrancar y alquileres terminados. Cada sweeper es
//! idempotente, así que correrlo junto a los sweepers inline del servidor
//! es seguro.
//!
//! Uso: `expire_holds [ttl_horas]`

use anyhow::Result;
use dotenvy::dotenv;
use tracing::info;

use vehicle_marketplace::config::environment::parse_ttl_hours;
use vehicle_marketplace::database::{create_pool, run_migrations};
use vehicle_marketplace::services::location_service::LocationService;
use vehicle_marketplace::services::reservation_service::ReservationService;
use vehicle_marketplace::services::transaction_service::TransactionService;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let ttl_hours = parse_ttl_hours(std::env::args().nth(1));

    info!("🧹 expire_holds - barrido de holds vencidos (TTL {}h)", ttl_hours);

    let pool = create_pool(None).await?;
    run_migrations(&pool).await?;

    let transactions = TransactionService::new(pool.clone(), ttl_hours);
    let reservations = ReservationService::new(pool.clone(), ttl_hours);
    let locations = LocationService::new(pool.clone());

    let expired_purchases = transactions
        .expire_stale_purchase_requests(Some(ttl_hours))
        .await?;
    let finished_reservations = reservations.expire_finished_reservations().await?;
    let stale_reservations = reservations
        .expire_stale_pending_reservations(Some(ttl_hours))
        .await?;
    let started_locations = locations.start_due_locations().await?;
    let finished_locations = locations.expire_finished_locations().await?;

    info!("✅ Barrido terminado:");
    info!("   demandas de compra canceladas: {}", expired_purchases);
    info!("   reservas terminadas: {}", finished_reservations);
    info!("   reservas pendientes canceladas: {}", stale_reservations);
    info!("   alquileres arrancados: {}", started_locations);
    info!("   alquileres terminados: {}", finished_locations);

    Ok(())
}
