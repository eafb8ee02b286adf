//! Repositorio de transacciones de compra
//!
//! Las búsquedas por actor filtran por `(id, actor, status = 'pending')`:
//! cero filas cubre a la vez not-found, forbidden y wrong-state, igual que
//! hace la capa de servicio al mapear el error.

use crate::models::transaction::Transaction;
use crate::utils::errors::AppError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, AppError> {
        let trx = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(trx)
    }

    pub async fn find_pending_for_buyer(
        &self,
        id: Uuid,
        buyer_id: Uuid,
    ) -> Result<Option<Transaction>, AppError> {
        let trx = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE id = $1 AND buyer_id = $2 AND status = 'pending'",
        )
        .bind(id)
        .bind(buyer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(trx)
    }

    pub async fn find_pending_for_seller(
        &self,
        id: Uuid,
        seller_id: Uuid,
    ) -> Result<Option<Transaction>, AppError> {
        let trx = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE id = $1 AND seller_id = $2 AND status = 'pending'",
        )
        .bind(id)
        .bind(seller_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(trx)
    }

    /// Historial de compras del usuario
    pub async fn list_by_buyer(&self, buyer_id: Uuid) -> Result<Vec<Transaction>, AppError> {
        let rows = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE buyer_id = $1 ORDER BY created_at DESC",
        )
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Historial de ventas del usuario
    pub async fn list_by_seller(&self, seller_id: Uuid) -> Result<Vec<Transaction>, AppError> {
        let rows = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE seller_id = $1 ORDER BY created_at DESC",
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ==================== Operaciones dentro de la transacción SQL ====================

    pub async fn insert_pending(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        buyer_id: Uuid,
        seller_id: Uuid,
        final_price: Decimal,
    ) -> Result<Transaction, AppError> {
        let trx = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (id, vehicle_id, buyer_id, seller_id, final_price,
                                      status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 'pending', $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(buyer_id)
        .bind(seller_id)
        .bind(final_price)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(trx)
    }

    /// Demanda pendiente ya existente de este comprador sobre el vehículo
    pub async fn find_pending_by_vehicle_and_buyer(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        buyer_id: Uuid,
    ) -> Result<Option<Transaction>, AppError> {
        let trx = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            WHERE vehicle_id = $1 AND buyer_id = $2 AND status = 'pending'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .bind(buyer_id)
        .fetch_optional(conn)
        .await?;

        Ok(trx)
    }

    /// ¿Queda alguna demanda pendiente sobre el vehículo (excluyendo una)?
    pub async fn exists_pending_for_vehicle(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM transactions
                WHERE vehicle_id = $1 AND status = 'pending'
                  AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(exclude)
        .fetch_one(conn)
        .await?;

        Ok(exists)
    }

    /// Cancela la transacción si sigue pendiente; devuelve filas afectadas
    pub async fn mark_cancelled(conn: &mut PgConnection, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE transactions SET status = 'cancelled', updated_at = $2 WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn mark_confirmed(
        conn: &mut PgConnection,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = 'confirmed', confirmed_at = $2, updated_at = $2
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Al confirmar una venta se retiran todas las demandas rivales
    pub async fn cancel_other_pending(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        keep_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = 'cancelled', updated_at = $3
            WHERE vehicle_id = $1 AND status = 'pending' AND id <> $2
            "#,
        )
        .bind(vehicle_id)
        .bind(keep_id)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Vehículos con demandas pendientes más viejas que el cutoff
    pub async fn stale_pending_vehicle_ids(
        conn: &mut PgConnection,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, AppError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT DISTINCT vehicle_id FROM transactions WHERE status = 'pending' AND created_at < $1",
        )
        .bind(cutoff)
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Cancela en bloque las demandas pendientes vencidas
    pub async fn cancel_stale_pending(
        conn: &mut PgConnection,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE transactions SET status = 'cancelled', updated_at = $2 WHERE status = 'pending' AND created_at < $1",
        )
        .bind(cutoff)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}
