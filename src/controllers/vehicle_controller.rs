//! Controller del catálogo de vehículos
//!
//! CRUD de anuncios y moderación. Los flujos transaccionales (compra,
//! reserva, alquiler) viven en sus servicios; aquí solo catálogo.

use crate::dto::vehicle_dto::{
    CreateVehicleRequest, ModerateVehicleRequest, UpdateVehicleRequest, VehicleFilterQuery,
    VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::models::notification::NotificationKind;
use crate::models::vehicle::ModerationStatus;
use crate::repositories::vehicle_repository::{VehicleFilters, VehicleRepository};
use crate::services::notification_service::NotificationService;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct VehicleController {
    repository: VehicleRepository,
    notifications: NotificationService,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            notifications: NotificationService::new(pool),
        }
    }

    /// Publica un anuncio (queda en moderación) y avisa al staff
    pub async fn create(
        &self,
        seller_id: Uuid,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let vehicle = self
            .repository
            .create(
                seller_id,
                request.brand,
                request.model,
                request.year,
                request.price,
                request.mileage,
                request.color,
                request.condition,
                request.description,
                request.location.unwrap_or_default(),
            )
            .await?;

        self.notifications
            .notify_staff(
                NotificationKind::NewListing,
                "Nuevo anuncio por validar",
                &format!("{} {} ({})", vehicle.brand, vehicle.model, vehicle.year),
                &format!("/vehicles/{}", vehicle.id),
            )
            .await?;

        tracing::info!(vehicle_id = %vehicle.id, "anuncio publicado, pendiente de moderación");

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Anuncio publicado, pendiente de validación".to_string(),
        ))
    }

    /// Ficha pública: incrementa el contador de vistas
    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        self.repository.increment_view_count(id).await?;

        Ok(VehicleResponse::from(vehicle))
    }

    /// Catálogo público con filtros
    pub async fn list(&self, query: VehicleFilterQuery) -> Result<Vec<VehicleResponse>, AppError> {
        let filters = VehicleFilters {
            brand: query.brand,
            model: query.model,
            year_from: query.year_from,
            year_to: query.year_to,
            max_price: query.max_price,
            limit: query.limit,
            offset: query.offset,
        };

        let vehicles = self.repository.list_approved(&filters).await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    /// Anuncios del vendedor, incluidos los no aprobados
    pub async fn list_by_seller(&self, seller_id: Uuid) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.repository.list_by_seller(seller_id).await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        seller_id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let vehicle = self
            .repository
            .update(
                id,
                seller_id,
                request.price,
                request.mileage,
                request.description,
                request.location,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Anuncio actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, seller_id: Uuid) -> Result<(), AppError> {
        self.repository.delete(id, seller_id).await
    }

    /// Moderación de un anuncio (solo staff). Avisa al vendedor del veredicto.
    pub async fn moderate(
        &self,
        id: Uuid,
        request: ModerateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let status = ModerationStatus::parse(&request.status).ok_or_else(|| {
            AppError::BadRequest(format!("Estado de moderación inválido: {}", request.status))
        })?;

        let reason = request.reason.unwrap_or_default();
        let vehicle = self
            .repository
            .set_moderation(id, status.as_str(), &reason)
            .await?;

        let (title, body) = match status {
            ModerationStatus::Approved => (
                "Anuncio aprobado",
                format!("Tu anuncio {} {} ya es visible", vehicle.brand, vehicle.model),
            ),
            ModerationStatus::Rejected => (
                "Anuncio rechazado",
                if reason.is_empty() {
                    "Tu anuncio fue rechazado".to_string()
                } else {
                    format!("Tu anuncio fue rechazado: {}", reason)
                },
            ),
            ModerationStatus::Pending => (
                "Anuncio en revisión",
                "Tu anuncio volvió a moderación".to_string(),
            ),
        };

        self.notifications
            .notify(
                &[vehicle.seller_id],
                NotificationKind::NewListing,
                title,
                &body,
                &format!("/vehicles/{}", vehicle.id),
            )
            .await?;

        tracing::info!(
            vehicle_id = %id,
            status = status.as_str(),
            "anuncio moderado"
        );

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Moderación registrada".to_string(),
        ))
    }
}
