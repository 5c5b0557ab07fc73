//! Restaurant Model

use serde::{Deserialize, Serialize};

/// Restaurant entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    /// Subscription tier label, informational only
    #[serde(rename = "plan", default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}
