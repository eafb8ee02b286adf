//! DTOs de autenticación

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request de registro
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 150))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 3, max = 150))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Response de login con el token emitido
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub username: String,
    pub is_staff: bool,
    pub token: String,
}
