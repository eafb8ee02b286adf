//! DTOs de valoraciones

use crate::models::review::Review;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request de creación (o reemplazo) de valoración
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub vehicle_id: Uuid,

    #[validate(range(min = 1, max = 5))]
    pub rating: i16,

    #[validate(
        length(min = 1, max = 2000),
        custom = "crate::utils::validation::validate_not_empty"
    )]
    pub comment: String,
}

/// Request de moderación de valoración (staff)
#[derive(Debug, Deserialize)]
pub struct ModerateReviewRequest {
    pub approved: bool,
}

/// Response de valoración
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub vehicle_id: String,
    pub author_id: String,
    pub rating: i16,
    pub comment: String,
    pub is_approved: bool,
    pub created_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.to_string(),
            vehicle_id: review.vehicle_id.to_string(),
            author_id: review.author_id.to_string(),
            rating: review.rating,
            comment: review.comment,
            is_approved: review.is_approved,
            created_at: review.created_at.to_rfc3339(),
        }
    }
}
