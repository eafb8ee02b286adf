//! Repositorio de alquileres
//!
//! Mismo predicado de solape que las reservas, restringido a los estados
//! {upcoming, active}.

use crate::models::location::Location;
use crate::utils::errors::AppError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, AppError> {
        let loc = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(loc)
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Location>, AppError> {
        let rows = sqlx::query_as::<_, Location>(
            "SELECT * FROM locations WHERE client_id = $1 ORDER BY created_at DESC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Location>, AppError> {
        let rows = sqlx::query_as::<_, Location>(
            "SELECT * FROM locations WHERE vehicle_id = $1 ORDER BY start_at",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Alquiler en curso que cubre el instante `now`
    pub async fn find_active_now(
        &self,
        vehicle_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Location>, AppError> {
        let loc = sqlx::query_as::<_, Location>(
            r#"
            SELECT * FROM locations
            WHERE vehicle_id = $1 AND status = 'active' AND start_at <= $2 AND end_at > $2
            ORDER BY end_at
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loc)
    }

    /// Próximo alquiler a futuro, para mostrar en la ficha del vehículo
    pub async fn find_next_upcoming(
        &self,
        vehicle_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Location>, AppError> {
        let loc = sqlx::query_as::<_, Location>(
            r#"
            SELECT * FROM locations
            WHERE vehicle_id = $1 AND status = 'upcoming' AND start_at >= $2
            ORDER BY start_at
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loc)
    }

    // ==================== Operaciones dentro de la transacción SQL ====================

    pub async fn find_by_id_in_tx(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Location>, AppError> {
        let loc = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(loc)
    }

    /// ¿Algún alquiler {upcoming, active} solapa el intervalo [start, end)?
    pub async fn overlaps(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM locations
                WHERE vehicle_id = $1
                  AND status IN ('upcoming', 'active')
                  AND start_at < $3
                  AND end_at > $2
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(start)
        .bind(end)
        .fetch_one(conn)
        .await?;

        Ok(exists)
    }

    pub async fn insert_upcoming(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        client_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        total_price: Option<Decimal>,
        conditions: &str,
    ) -> Result<Location, AppError> {
        let loc = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (id, vehicle_id, client_id, start_at, end_at, status,
                                   total_price, conditions, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 'upcoming', $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(client_id)
        .bind(start)
        .bind(end)
        .bind(total_price)
        .bind(conditions)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(loc)
    }

    pub async fn record_pickup(
        conn: &mut PgConnection,
        id: Uuid,
        mileage: i32,
        fuel: i16,
    ) -> Result<Location, AppError> {
        let loc = sqlx::query_as::<_, Location>(
            r#"
            UPDATE locations
            SET pickup_mileage = $2, pickup_fuel = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mileage)
        .bind(fuel)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(loc)
    }

    pub async fn record_return(
        conn: &mut PgConnection,
        id: Uuid,
        mileage: i32,
        fuel: i16,
    ) -> Result<Location, AppError> {
        let loc = sqlx::query_as::<_, Location>(
            r#"
            UPDATE locations
            SET return_mileage = $2, return_fuel = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mileage)
        .bind(fuel)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(loc)
    }

    /// Vehículos cuyos alquileres activos ya vencieron
    pub async fn finished_vehicle_ids(
        conn: &mut PgConnection,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, AppError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT vehicle_id FROM locations
            WHERE status IN ('upcoming', 'active') AND end_at < $1
            "#,
        )
        .bind(now)
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn complete_finished(
        conn: &mut PgConnection,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE locations
            SET status = 'completed', updated_at = $1
            WHERE status IN ('upcoming', 'active') AND end_at < $1
            "#,
        )
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Vehículos cuyos alquileres deben arrancar ahora
    pub async fn due_vehicle_ids(
        conn: &mut PgConnection,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, AppError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT vehicle_id FROM locations
            WHERE status = 'upcoming' AND start_at <= $1 AND end_at > $1
            "#,
        )
        .bind(now)
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn start_due(conn: &mut PgConnection, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE locations
            SET status = 'active', updated_at = $1
            WHERE status = 'upcoming' AND start_at <= $1 AND end_at > $1
            "#,
        )
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}
