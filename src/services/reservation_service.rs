//! Servicio de reservas
//!
//! Holds de corta duración (reserva o prueba de manejo) con expiración por
//! TTL. Toda entrada del dominio corre primero sus dos sweepers y después
//! trabaja bajo el lock exclusivo del row del vehículo.

use crate::models::reservation::{Reservation, ReservationKind, ReservationStatus};
use crate::repositories::reservation_repository::ReservationRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ReservationService {
    pool: PgPool,
    repository: ReservationRepository,
    ttl_hours: i64,
}

impl ReservationService {
    pub fn new(pool: PgPool, ttl_hours: i64) -> Self {
        Self {
            repository: ReservationRepository::new(pool.clone()),
            pool,
            ttl_hours: ttl_hours.max(1),
        }
    }

    /// Marca terminadas las reservas cuyo fin ya pasó y libera los vehículos
    /// sin otra reserva activa. Idempotente.
    pub async fn expire_finished_reservations(&self) -> Result<u64, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let vehicle_ids = ReservationRepository::finished_vehicle_ids(&mut *tx, now).await?;
        if vehicle_ids.is_empty() {
            return Ok(0);
        }

        let completed = ReservationRepository::complete_finished(&mut *tx, now).await?;
        VehicleRepository::release_reserved_without_active_reservations(&mut *tx, &vehicle_ids)
            .await?;

        tx.commit().await?;

        tracing::info!(completed, "reservas vencidas marcadas como terminadas");
        Ok(completed)
    }

    /// Cancela las reservas pendientes más viejas que el TTL. Idempotente.
    pub async fn expire_stale_pending_reservations(
        &self,
        ttl_hours: Option<i64>,
    ) -> Result<u64, AppError> {
        let ttl = ttl_hours.unwrap_or(self.ttl_hours).max(1);
        let cutoff = Utc::now() - Duration::hours(ttl);

        let mut tx = self.pool.begin().await?;

        let vehicle_ids =
            ReservationRepository::stale_pending_vehicle_ids(&mut *tx, cutoff).await?;
        if vehicle_ids.is_empty() {
            return Ok(0);
        }

        let cancelled = ReservationRepository::cancel_stale_pending(&mut *tx, cutoff).await?;
        VehicleRepository::release_reserved_without_active_reservations(&mut *tx, &vehicle_ids)
            .await?;

        tx.commit().await?;

        tracing::info!(cancelled, ttl_hours = ttl, "reservas pendientes expiradas");
        Ok(cancelled)
    }

    /// Crea una reserva pendiente sobre un vehículo disponible.
    pub async fn create_reservation(
        &self,
        vehicle_id: Uuid,
        client_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        kind: ReservationKind,
        note: &str,
        signature: &str,
    ) -> Result<Reservation, AppError> {
        if start >= end {
            return Err(AppError::InvalidInterval(
                "Franja inválida (inicio >= fin)".to_string(),
            ));
        }

        self.expire_finished_reservations().await?;
        self.expire_stale_pending_reservations(None).await?;

        let mut tx = self.pool.begin().await?;

        let vehicle = VehicleRepository::lock_by_id(&mut *tx, vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.is_sold {
            return Err(AppError::AlreadySold(
                "Este vehículo ya fue vendido".to_string(),
            ));
        }

        if vehicle.is_reserved {
            return Err(AppError::AlreadyReserved(
                "Este vehículo ya está reservado".to_string(),
            ));
        }

        if ReservationRepository::overlaps(&mut *tx, vehicle_id, start, end, None).await? {
            return Err(AppError::SlotUnavailable(
                "Esa franja no está disponible".to_string(),
            ));
        }

        let reservation = ReservationRepository::insert_pending(
            &mut *tx,
            vehicle_id,
            client_id,
            kind.as_str(),
            start,
            end,
            note,
            signature,
        )
        .await?;

        VehicleRepository::set_reserved(&mut *tx, vehicle_id, true).await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id = %reservation.id,
            vehicle_id = %vehicle_id,
            kind = kind.as_str(),
            "reserva creada"
        );

        Ok(reservation)
    }

    /// Transición pedida por un actor: aceptar, rechazar o anular.
    /// Solo el vendedor del vehículo o el cliente de la reserva tienen standing.
    pub async fn update_status(
        &self,
        reservation_id: Uuid,
        actor_id: Uuid,
        new_status: ReservationStatus,
    ) -> Result<Reservation, AppError> {
        if !new_status.is_actor_transition() {
            return Err(AppError::InvalidState(format!(
                "Estado destino inválido: {}",
                new_status.as_str()
            )));
        }

        let mut tx = self.pool.begin().await?;

        let reservation = ReservationRepository::find_by_id_in_tx(&mut *tx, reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        let vehicle = VehicleRepository::lock_by_id(&mut *tx, reservation.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.seller_id != actor_id && reservation.client_id != actor_id {
            return Err(AppError::Forbidden(
                "No tienes permiso sobre esta reserva".to_string(),
            ));
        }

        let updated =
            ReservationRepository::update_status(&mut *tx, reservation_id, new_status.as_str())
                .await?;

        if matches!(
            new_status,
            ReservationStatus::Refused | ReservationStatus::Cancelled
        ) {
            // Re-chequeo acotado al intervalo recién liberado: otra reserva
            // activa que lo solape sigue justificando el flag.
            let overlapping = ReservationRepository::overlaps(
                &mut *tx,
                reservation.vehicle_id,
                reservation.start_at,
                reservation.end_at,
                Some(reservation.id),
            )
            .await?;
            if !overlapping {
                VehicleRepository::set_reserved(&mut *tx, reservation.vehicle_id, false).await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            reservation_id = %reservation_id,
            new_status = new_status.as_str(),
            "estado de reserva actualizado"
        );

        Ok(updated)
    }

    /// Reservas del cliente
    pub async fn reservations_of(&self, client_id: Uuid) -> Result<Vec<Reservation>, AppError> {
        self.expire_finished_reservations().await?;
        self.repository.list_by_client(client_id).await
    }

    /// Agenda de reservas de un vehículo
    pub async fn schedule_of(&self, vehicle_id: Uuid) -> Result<Vec<Reservation>, AppError> {
        self.expire_finished_reservations().await?;
        self.repository.list_by_vehicle(vehicle_id).await
    }
}
