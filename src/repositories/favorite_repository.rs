//! Repositorio de favoritos

use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Alterna el favorito; devuelve `true` si el vehículo quedó marcado
    pub async fn toggle(&self, user_id: Uuid, vehicle_id: Uuid) -> Result<bool, AppError> {
        let removed = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND vehicle_id = $2")
            .bind(user_id)
            .bind(vehicle_id)
            .execute(&self.pool)
            .await?;

        if removed.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO favorites (id, user_id, vehicle_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, vehicle_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(vehicle_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(true)
    }

    pub async fn is_favorite(&self, user_id: Uuid, vehicle_id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND vehicle_id = $2)",
        )
        .bind(user_id)
        .bind(vehicle_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Vehículos marcados por el usuario, del más reciente al más viejo
    pub async fn list_vehicles_for_user(&self, user_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let rows = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT v.* FROM vehicles v
            JOIN favorites f ON f.vehicle_id = v.id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
