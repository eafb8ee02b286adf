//! Repositorio de valoraciones

use crate::models::review::Review;
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserta o reemplaza la valoración del autor sobre el vehículo.
    /// Un reenvío pisa nota y comentario y vuelve al estado sin aprobar.
    pub async fn upsert(
        &self,
        vehicle_id: Uuid,
        author_id: Uuid,
        rating: i16,
        comment: &str,
    ) -> Result<Review, AppError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (id, vehicle_id, author_id, rating, comment, is_approved, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6, $6)
            ON CONFLICT (vehicle_id, author_id)
            DO UPDATE SET rating = EXCLUDED.rating,
                          comment = EXCLUDED.comment,
                          is_approved = FALSE,
                          updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(author_id)
        .bind(rating)
        .bind(comment)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    /// Solo las valoraciones aprobadas son visibles en la ficha pública
    pub async fn list_approved_for_vehicle(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<Review>, AppError> {
        let rows = sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE vehicle_id = $1 AND is_approved
            ORDER BY created_at DESC
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Cola de moderación: todo lo que todavía no fue aprobado
    pub async fn list_pending(&self) -> Result<Vec<Review>, AppError> {
        let rows = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE NOT is_approved ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn set_approved(
        &self,
        id: Uuid,
        approved: bool,
    ) -> Result<Option<Review>, AppError> {
        let review = sqlx::query_as::<_, Review>(
            "UPDATE reviews SET is_approved = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(approved)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }
}
