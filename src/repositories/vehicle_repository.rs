//! Repositorio de vehículos
//!
//! Además del CRUD del catálogo, este módulo expone el ledger de
//! disponibilidad: las operaciones que mutan `is_sold` / `is_reserved` /
//! `is_rented` reciben la conexión de una transacción abierta y asumen que
//! el caller ya bloqueó el row del vehículo con [`VehicleRepository::lock_by_id`].

use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Filtros para el listado público del catálogo
#[derive(Debug, Default)]
pub struct VehicleFilters {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub max_price: Option<Decimal>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        seller_id: Uuid,
        brand: String,
        model: String,
        year: i32,
        price: Decimal,
        mileage: i32,
        color: String,
        condition: String,
        description: String,
        location: String,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, seller_id, brand, model, year, price, mileage, color,
                                  condition, description, moderation_status, created_at, updated_at, location)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending', $11, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(seller_id)
        .bind(brand)
        .bind(model)
        .bind(year)
        .bind(price)
        .bind(mileage)
        .bind(color)
        .bind(condition)
        .bind(description)
        .bind(Utc::now())
        .bind(location)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    /// Listado público: solo anuncios aprobados, más recientes primero
    pub async fn list_approved(&self, filters: &VehicleFilters) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE moderation_status = 'approved'
              AND ($1::text IS NULL OR brand ILIKE $1)
              AND ($2::text IS NULL OR model ILIKE $2)
              AND ($3::int IS NULL OR year >= $3)
              AND ($4::int IS NULL OR year <= $4)
              AND ($5::numeric IS NULL OR price <= $5)
            ORDER BY created_at DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(filters.brand.as_ref().map(|b| format!("%{}%", b)))
        .bind(filters.model.as_ref().map(|m| format!("%{}%", m)))
        .bind(filters.year_from)
        .bind(filters.year_to)
        .bind(filters.max_price)
        .bind(filters.limit.unwrap_or(50).clamp(1, 200))
        .bind(filters.offset.unwrap_or(0).max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn list_by_seller(&self, seller_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE seller_id = $1 ORDER BY created_at DESC",
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn update(
        &self,
        id: Uuid,
        seller_id: Uuid,
        price: Option<Decimal>,
        mileage: Option<i32>,
        description: Option<String>,
        location: Option<String>,
    ) -> Result<Vehicle, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if current.seller_id != seller_id {
            return Err(AppError::Forbidden(
                "El vehículo no pertenece a este vendedor".to_string(),
            ));
        }

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET price = $2, mileage = $3, description = $4, location = $5, updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(price.unwrap_or(current.price))
        .bind(mileage.unwrap_or(current.mileage))
        .bind(description.unwrap_or(current.description))
        .bind(location.unwrap_or(current.location))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid, seller_id: Uuid) -> Result<(), AppError> {
        let vehicle = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.seller_id != seller_id {
            return Err(AppError::Forbidden(
                "El vehículo no pertenece a este vendedor".to_string(),
            ));
        }

        if vehicle.is_sold || vehicle.is_reserved || vehicle.is_rented {
            return Err(AppError::InvalidState(
                "No se puede eliminar un anuncio con holds activos".to_string(),
            ));
        }

        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn increment_view_count(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE vehicles SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Moderación de anuncios (solo staff)
    pub async fn set_moderation(
        &self,
        id: Uuid,
        status: &str,
        reason: &str,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET moderation_status = $2, moderation_reason = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(reason)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        Ok(vehicle)
    }

    // ==================== Ledger de disponibilidad (bajo lock) ====================

    /// Bloquea el row del vehículo de forma exclusiva dentro de la transacción.
    /// Toda mutación de flags debe pasar antes por aquí.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Vehicle>, AppError> {
        let vehicle =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(conn)
                .await?;

        Ok(vehicle)
    }

    /// Marca el vehículo como reservado (demanda de compra o reserva activa)
    pub async fn set_reserved(
        conn: &mut PgConnection,
        id: Uuid,
        reserved: bool,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE vehicles SET is_reserved = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(reserved)
            .bind(Utc::now())
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Venta confirmada: estado terminal del ledger
    pub async fn mark_sold(conn: &mut PgConnection, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE vehicles SET is_sold = TRUE, is_reserved = FALSE, updated_at = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Un alquiler bloquea también las reservas, por eso setea ambos flags
    pub async fn set_rented(
        conn: &mut PgConnection,
        id: Uuid,
        rented: bool,
        reserved: bool,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE vehicles SET is_rented = $2, is_reserved = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(rented)
        .bind(reserved)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Libera `is_reserved` en los vehículos indicados que ya no tienen
    /// ninguna transacción de compra pendiente (operación set-based del sweeper)
    pub async fn release_reserved_without_pending_transactions(
        conn: &mut PgConnection,
        vehicle_ids: &[Uuid],
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles v
            SET is_reserved = FALSE, updated_at = $2
            WHERE v.id = ANY($1)
              AND v.is_reserved
              AND NOT EXISTS (
                  SELECT 1 FROM transactions t
                  WHERE t.vehicle_id = v.id AND t.status = 'pending'
              )
            "#,
        )
        .bind(vehicle_ids)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Libera `is_reserved` en los vehículos indicados sin reserva activa restante
    pub async fn release_reserved_without_active_reservations(
        conn: &mut PgConnection,
        vehicle_ids: &[Uuid],
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles v
            SET is_reserved = FALSE, updated_at = $2
            WHERE v.id = ANY($1)
              AND v.is_reserved
              AND NOT EXISTS (
                  SELECT 1 FROM reservations r
                  WHERE r.vehicle_id = v.id AND r.status IN ('pending', 'accepted')
              )
            "#,
        )
        .bind(vehicle_ids)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Libera ambos flags al terminar los alquileres de los vehículos indicados
    pub async fn release_rented(
        conn: &mut PgConnection,
        vehicle_ids: &[Uuid],
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET is_rented = FALSE, is_reserved = FALSE, updated_at = $2
            WHERE id = ANY($1) AND is_rented
            "#,
        )
        .bind(vehicle_ids)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Setea ambos flags al arrancar los alquileres de los vehículos indicados
    pub async fn mark_rented(
        conn: &mut PgConnection,
        vehicle_ids: &[Uuid],
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET is_rented = TRUE, is_reserved = TRUE, updated_at = $2
            WHERE id = ANY($1)
            "#,
        )
        .bind(vehicle_ids)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}
