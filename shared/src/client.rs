//! Client-related types shared with the backend
//!
//! Auth request/response bodies used by the REST client.

use serde::{Deserialize, Serialize};

use crate::models::Role;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "usuario_id")]
    pub user_id: i64,
    #[serde(rename = "restaurante_id")]
    pub restaurant_id: i64,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "plan", default)]
    pub tier: Option<String>,
}
