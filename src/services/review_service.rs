//! Servicio de valoraciones
//!
//! Una valoración por autor y vehículo; reenviar reemplaza la anterior y
//! la devuelve a la cola de moderación. Solo las aprobadas se publican.

use crate::models::review::{rating_in_range, Review, MAX_RATING, MIN_RATING};
use crate::repositories::review_repository::ReviewRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ReviewService {
    repository: ReviewRepository,
    vehicles: VehicleRepository,
}

impl ReviewService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ReviewRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    /// Crea o reemplaza la valoración del autor sobre el anuncio
    pub async fn add_review(
        &self,
        vehicle_id: Uuid,
        author_id: Uuid,
        rating: i16,
        comment: &str,
    ) -> Result<Review, AppError> {
        if !rating_in_range(rating) {
            return Err(AppError::BadRequest(format!(
                "La nota debe estar entre {} y {}",
                MIN_RATING, MAX_RATING
            )));
        }

        let comment = comment.trim();
        if comment.is_empty() {
            return Err(AppError::BadRequest("Comentario vacío".to_string()));
        }

        let vehicle = self
            .vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.seller_id == author_id {
            return Err(AppError::Forbidden(
                "No puedes valorar tu propio anuncio".to_string(),
            ));
        }

        let review = self
            .repository
            .upsert(vehicle_id, author_id, rating, comment)
            .await?;

        tracing::info!(review_id = %review.id, %vehicle_id, rating, "valoración enviada a moderación");
        Ok(review)
    }

    /// Valoraciones públicas del vehículo (aprobadas)
    pub async fn reviews_of(&self, vehicle_id: Uuid) -> Result<Vec<Review>, AppError> {
        self.repository.list_approved_for_vehicle(vehicle_id).await
    }

    /// Cola de moderación para el staff
    pub async fn moderation_queue(&self) -> Result<Vec<Review>, AppError> {
        self.repository.list_pending().await
    }

    /// Aprueba o rechaza una valoración
    pub async fn moderate(&self, review_id: Uuid, approved: bool) -> Result<Review, AppError> {
        let review = self
            .repository
            .set_approved(review_id, approved)
            .await?
            .ok_or_else(|| AppError::NotFound("Valoración no encontrada".to_string()))?;

        tracing::info!(review_id = %review.id, approved, "valoración moderada");
        Ok(review)
    }
}
