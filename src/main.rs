use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use vehicle_marketplace::config::environment::EnvironmentConfig;
use vehicle_marketplace::database::{create_pool, mask_database_url, run_migrations};
use vehicle_marketplace::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use vehicle_marketplace::routes;
use vehicle_marketplace::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Vehicle Marketplace - API");
    info!("============================");

    if let Ok(url) = std::env::var("DATABASE_URL") {
        info!("🗄️  Base de datos: {}", mask_database_url(&url));
    }

    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if let Err(e) = run_migrations(&pool).await {
        error!("❌ Error ejecutando migraciones: {}", e);
        return Err(anyhow::anyhow!("Error de migraciones: {}", e));
    }
    info!("✅ Migraciones aplicadas");

    let config = EnvironmentConfig::default();
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // En producción el CORS se restringe a los orígenes configurados
    let cors = if config.is_production() {
        info!("🔒 CORS restringido a: {:?}", config.cors_origins);
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    let app_state = AppState::new(pool, config);

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/auth", routes::auth_routes::create_auth_router())
        .nest(
            "/api/vehicles",
            routes::vehicle_routes::create_vehicle_router(app_state.clone()),
        )
        .nest(
            "/api/transactions",
            routes::transaction_routes::create_transaction_router(app_state.clone()),
        )
        .nest(
            "/api/reservations",
            routes::reservation_routes::create_reservation_router(app_state.clone()),
        )
        .nest(
            "/api/locations",
            routes::location_routes::create_location_router(app_state.clone()),
        )
        .nest(
            "/api/messages",
            routes::message_routes::create_message_router(app_state.clone()),
        )
        .nest(
            "/api/notifications",
            routes::notification_routes::create_notification_router(app_state.clone()),
        )
        .nest(
            "/api/favorites",
            routes::favorite_routes::create_favorite_router(app_state.clone()),
        )
        .nest(
            "/api/reviews",
            routes::review_routes::create_review_router(app_state.clone()),
        )
        .layer(cors)
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Auth:");
    info!("   POST /api/auth/register - Registrar usuario");
    info!("   POST /api/auth/login - Login");
    info!("🚗 Vehículos:");
    info!("   GET  /api/vehicles - Catálogo público");
    info!("   POST /api/vehicles - Publicar anuncio");
    info!("   GET  /api/vehicles/:id - Ficha del vehículo");
    info!("   PUT  /api/vehicles/:id - Editar anuncio");
    info!("   DELETE /api/vehicles/:id - Eliminar anuncio");
    info!("   POST /api/vehicles/:id/moderate - Moderar (staff)");
    info!("   GET  /api/vehicles/:id/schedule - Agenda de reservas");
    info!("   GET  /api/vehicles/:id/rental-status - Disponibilidad de alquiler");
    info!("💰 Transacciones:");
    info!("   POST /api/transactions - Demanda de compra");
    info!("   POST /api/transactions/:id/cancel - Anular (comprador)");
    info!("   POST /api/transactions/:id/refuse - Rechazar (vendedor)");
    info!("   POST /api/transactions/:id/confirm - Confirmar venta (vendedor)");
    info!("   GET  /api/transactions/purchases - Mis compras");
    info!("   GET  /api/transactions/sales - Mis ventas");
    info!("📅 Reservas:");
    info!("   POST /api/reservations - Crear reserva");
    info!("   PUT  /api/reservations/:id/status - Cambiar estado");
    info!("   GET  /api/reservations/mine - Mis reservas");
    info!("🔑 Alquileres:");
    info!("   POST /api/locations - Crear alquiler");
    info!("   POST /api/locations/:id/pickup - Registrar entrega");
    info!("   POST /api/locations/:id/return - Registrar devolución");
    info!("   GET  /api/locations/mine - Mis alquileres");
    info!("💬 Mensajería:");
    info!("   POST /api/messages - Enviar mensaje");
    info!("   GET  /api/messages/conversations - Mis conversaciones");
    info!("   GET  /api/messages/conversations/:id - Leer conversación");
    info!("🔔 Notificaciones:");
    info!("   GET  /api/notifications - Bandeja");
    info!("⭐ Favoritos y valoraciones:");
    info!("   POST /api/favorites/:vehicle_id/toggle - Marcar/desmarcar favorito");
    info!("   GET  /api/favorites/mine - Mis favoritos");
    info!("   POST /api/reviews - Enviar valoración");
    info!("   GET  /api/reviews/vehicle/:id - Valoraciones del vehículo");
    info!("   GET  /api/reviews/pending - Cola de moderación (staff)");
    info!("   POST /api/reviews/:id/moderate - Moderar valoración (staff)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
