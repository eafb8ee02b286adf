//! Servicio de favoritos
//!
//! Marcar y desmarcar anuncios. El favorito no toca el ledger de
//! disponibilidad; es puramente una lista personal.

use crate::models::vehicle::Vehicle;
use crate::repositories::favorite_repository::FavoriteRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct FavoriteService {
    repository: FavoriteRepository,
    vehicles: VehicleRepository,
}

impl FavoriteService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: FavoriteRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    /// Alterna el favorito del usuario; devuelve `true` si quedó marcado
    pub async fn toggle(&self, user_id: Uuid, vehicle_id: Uuid) -> Result<bool, AppError> {
        self.vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let favorited = self.repository.toggle(user_id, vehicle_id).await?;
        tracing::info!(%user_id, %vehicle_id, favorited, "favorito alternado");
        Ok(favorited)
    }

    pub async fn is_favorite(&self, user_id: Uuid, vehicle_id: Uuid) -> Result<bool, AppError> {
        self.repository.is_favorite(user_id, vehicle_id).await
    }

    pub async fn my_favorites(&self, user_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        self.repository.list_vehicles_for_user(user_id).await
    }
}
