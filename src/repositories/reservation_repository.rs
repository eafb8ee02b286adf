//! Repositorio de reservas
//!
//! El predicado de solape usa intervalos semiabiertos [start_at, end_at):
//! dos reservas chocan si `start_at < $end AND end_at > $start`.

use crate::models::reservation::Reservation;
use crate::utils::errors::AppError;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, AppError> {
        let res = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(res)
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Reservation>, AppError> {
        let rows = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE client_id = $1 ORDER BY created_at DESC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Reservation>, AppError> {
        let rows = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE vehicle_id = $1 ORDER BY start_at",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ==================== Operaciones dentro de la transacción SQL ====================

    pub async fn find_by_id_in_tx(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Reservation>, AppError> {
        let res = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(res)
    }

    /// ¿Alguna reserva activa solapa el intervalo [start, end)?
    pub async fn overlaps(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reservations
                WHERE vehicle_id = $1
                  AND status IN ('pending', 'accepted')
                  AND start_at < $3
                  AND end_at > $2
                  AND ($4::uuid IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(start)
        .bind(end)
        .bind(exclude)
        .fetch_one(conn)
        .await?;

        Ok(exists)
    }

    pub async fn insert_pending(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        client_id: Uuid,
        kind: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        note: &str,
        signature: &str,
    ) -> Result<Reservation, AppError> {
        let res = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (id, vehicle_id, client_id, kind, start_at, end_at,
                                      status, note, signature, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(client_id)
        .bind(kind)
        .bind(start)
        .bind(end)
        .bind(note)
        .bind(signature)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(res)
    }

    pub async fn update_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: &str,
    ) -> Result<Reservation, AppError> {
        let res = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(conn)
        .await?;

        Ok(res)
    }

    /// Vehículos con reservas activas ya vencidas (end_at en el pasado)
    pub async fn finished_vehicle_ids(
        conn: &mut PgConnection,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, AppError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT vehicle_id FROM reservations
            WHERE status IN ('pending', 'accepted') AND end_at < $1
            "#,
        )
        .bind(now)
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Marca terminadas las reservas activas vencidas
    pub async fn complete_finished(
        conn: &mut PgConnection,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE reservations SET status = 'completed' WHERE status IN ('pending', 'accepted') AND end_at < $1",
        )
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Vehículos con reservas pendientes más viejas que el cutoff del TTL
    pub async fn stale_pending_vehicle_ids(
        conn: &mut PgConnection,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, AppError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT DISTINCT vehicle_id FROM reservations WHERE status = 'pending' AND created_at < $1",
        )
        .bind(cutoff)
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Cancela las reservas pendientes vencidas por TTL
    pub async fn cancel_stale_pending(
        conn: &mut PgConnection,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE reservations SET status = 'cancelled' WHERE status = 'pending' AND created_at < $1",
        )
        .bind(cutoff)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}
