//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Table occupancy state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TableState {
    #[default]
    #[serde(rename = "disponible", alias = "available")]
    Available,
    #[serde(rename = "ocupada", alias = "occupied")]
    Occupied,
    /// Diners finished eating, bill pending
    #[serde(rename = "finalizada", alias = "finished")]
    Finished,
    #[serde(rename = "pagada", alias = "paid")]
    Paid,
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Available => "disponible",
            Self::Occupied => "ocupada",
            Self::Finished => "finalizada",
            Self::Paid => "pagada",
        };
        f.write_str(s)
    }
}

/// Seat at a table (silla)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub id: i64,
    #[serde(rename = "mesa_id")]
    pub table_id: i64,
    #[serde(rename = "numero")]
    pub number: i32,
}

/// Dining table entity (mesa)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: i64,
    #[serde(rename = "numero")]
    pub number: i32,
    #[serde(rename = "capacidad")]
    pub capacity: i32,
    #[serde(rename = "estado", default)]
    pub state: TableState,
    #[serde(rename = "sillas", default)]
    pub seats: Vec<Seat>,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiningTableCreate {
    #[serde(rename = "numero")]
    #[validate(range(min = 1, message = "table number must be positive"))]
    pub number: i32,
    #[serde(rename = "capacidad")]
    #[validate(range(min = 1, message = "capacity must be positive"))]
    pub capacity: i32,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DiningTableUpdate {
    #[serde(rename = "numero", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub number: Option<i32>,
    #[serde(rename = "capacidad", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
}

/// Table state change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStateUpdate {
    #[serde(rename = "estado")]
    pub state: TableState,
}

/// Create seat payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SeatCreate {
    #[serde(rename = "numero")]
    #[validate(range(min = 1))]
    pub number: i32,
}
