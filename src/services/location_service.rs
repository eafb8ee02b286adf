//! Servicio de alquileres
//!
//! Alquileres con rango de fechas. El sweeper promueve upcoming -> active al
//! llegar la fecha de inicio y active -> completed al vencer, siempre
//! ajustando los flags `is_rented` / `is_reserved` del ledger en la misma
//! transacción SQL.

use crate::models::location::{Location, RentalStatus};
use crate::repositories::location_repository::LocationRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

pub struct LocationService {
    pool: PgPool,
    repository: LocationRepository,
}

impl LocationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: LocationRepository::new(pool.clone()),
            pool,
        }
    }

    /// Marca terminados los alquileres vencidos y libera ambos flags.
    /// Idempotente.
    pub async fn expire_finished_locations(&self) -> Result<u64, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let vehicle_ids = LocationRepository::finished_vehicle_ids(&mut *tx, now).await?;
        if vehicle_ids.is_empty() {
            return Ok(0);
        }

        let completed = LocationRepository::complete_finished(&mut *tx, now).await?;
        VehicleRepository::release_rented(&mut *tx, &vehicle_ids).await?;

        tx.commit().await?;

        tracing::info!(completed, "alquileres vencidos marcados como terminados");
        Ok(completed)
    }

    /// Arranca los alquileres cuya fecha de inicio ya llegó. Idempotente.
    pub async fn start_due_locations(&self) -> Result<u64, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let vehicle_ids = LocationRepository::due_vehicle_ids(&mut *tx, now).await?;
        if vehicle_ids.is_empty() {
            return Ok(0);
        }

        let started = LocationRepository::start_due(&mut *tx, now).await?;
        VehicleRepository::mark_rented(&mut *tx, &vehicle_ids).await?;

        tx.commit().await?;

        tracing::info!(started, "alquileres arrancados");
        Ok(started)
    }

    /// Crea un alquiler `upcoming`. Un alquiler bloquea también nuevas
    /// reservas, por eso setea `is_rented` y `is_reserved` a la vez.
    pub async fn create_location(
        &self,
        vehicle_id: Uuid,
        client_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        total_price: Option<Decimal>,
        conditions: &str,
    ) -> Result<Location, AppError> {
        if start >= end {
            return Err(AppError::InvalidInterval(
                "Franja inválida (inicio >= fin)".to_string(),
            ));
        }

        self.expire_finished_locations().await?;
        self.start_due_locations().await?;

        let mut tx = self.pool.begin().await?;

        let vehicle = VehicleRepository::lock_by_id(&mut *tx, vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.is_sold {
            return Err(AppError::AlreadySold(
                "Este vehículo ya fue vendido".to_string(),
            ));
        }

        if vehicle.is_rented {
            return Err(AppError::AlreadyRented(
                "Vehículo ya alquilado".to_string(),
            ));
        }

        if LocationRepository::overlaps(&mut *tx, vehicle_id, start, end).await? {
            return Err(AppError::SlotUnavailable(
                "Franja no disponible".to_string(),
            ));
        }

        let location = LocationRepository::insert_upcoming(
            &mut *tx,
            vehicle_id,
            client_id,
            start,
            end,
            total_price,
            conditions,
        )
        .await?;

        VehicleRepository::set_rented(&mut *tx, vehicle_id, true, true).await?;

        tx.commit().await?;

        tracing::info!(
            location_id = %location.id,
            vehicle_id = %vehicle_id,
            "alquiler creado"
        );

        Ok(location)
    }

    /// Registro de kilometraje y combustible a la entrega del vehículo.
    /// Solo el vendedor del vehículo puede registrarlo.
    pub async fn record_pickup(
        &self,
        location_id: Uuid,
        actor_id: Uuid,
        mileage: i32,
        fuel: i16,
    ) -> Result<Location, AppError> {
        self.record_readings(location_id, actor_id, mileage, fuel, true).await
    }

    /// Registro de kilometraje y combustible a la devolución.
    pub async fn record_return(
        &self,
        location_id: Uuid,
        actor_id: Uuid,
        mileage: i32,
        fuel: i16,
    ) -> Result<Location, AppError> {
        self.record_readings(location_id, actor_id, mileage, fuel, false).await
    }

    async fn record_readings(
        &self,
        location_id: Uuid,
        actor_id: Uuid,
        mileage: i32,
        fuel: i16,
        pickup: bool,
    ) -> Result<Location, AppError> {
        if !(0..=100).contains(&fuel) {
            return Err(AppError::BadRequest(
                "Nivel de combustible fuera de rango (0-100)".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let location = LocationRepository::find_by_id_in_tx(&mut *tx, location_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Alquiler no encontrado".to_string()))?;

        let vehicle = VehicleRepository::lock_by_id(&mut *tx, location.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.seller_id != actor_id {
            return Err(AppError::Forbidden(
                "Solo el dueño del vehículo registra entregas".to_string(),
            ));
        }

        let updated = if pickup {
            LocationRepository::record_pickup(&mut *tx, location_id, mileage, fuel).await?
        } else {
            LocationRepository::record_return(&mut *tx, location_id, mileage, fuel).await?
        };

        tx.commit().await?;

        Ok(updated)
    }

    /// Vista compuesta de disponibilidad para la ficha del vehículo.
    /// Lectura pura, pero precedida por los sweepers para no servir estado viejo.
    pub async fn current_status(&self, vehicle_id: Uuid) -> Result<RentalStatus, AppError> {
        self.expire_finished_locations().await?;
        self.start_due_locations().await?;

        let now = Utc::now();

        let vehicle = VehicleRepository::new(self.pool.clone())
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let active = self.repository.find_active_now(vehicle_id, now).await?;
        let upcoming = self.repository.find_next_upcoming(vehicle_id, now).await?;

        let rented = active.is_some();
        let available = !rented && !vehicle.is_sold && !vehicle.is_reserved;
        let state_label = if rented {
            "rented"
        } else if vehicle.is_reserved {
            "reserved"
        } else {
            "available"
        }
        .to_string();

        Ok(RentalStatus {
            rented,
            active,
            upcoming,
            available,
            state_label,
        })
    }

    /// Alquileres del cliente
    pub async fn rentals_of(&self, client_id: Uuid) -> Result<Vec<Location>, AppError> {
        self.expire_finished_locations().await?;
        self.start_due_locations().await?;
        self.repository.list_by_client(client_id).await
    }
}
