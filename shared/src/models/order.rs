//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use validator::Validate;

use crate::order::OrderState;

/// Opaque order identifier (pedido_id)
///
/// The backend sends it as a string or as a bare integer; both compare equal
/// once decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for OrderId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

/// Order line (dish and quantity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "plato_id")]
    pub dish_id: i64,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
}

/// One timestamp per lifecycle transition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateTimestamps {
    #[serde(
        rename = "confirmado_en",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub confirmed_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "preparando_en",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub preparing_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "terminado_en",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub terminated_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "entregado_en",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl StateTimestamps {
    pub fn get(&self, state: OrderState) -> Option<DateTime<Utc>> {
        match state {
            OrderState::Confirmed => self.confirmed_at,
            OrderState::Preparing => self.preparing_at,
            OrderState::Terminated => self.terminated_at,
            OrderState::Delivered => self.delivered_at,
        }
    }

    pub fn set(&mut self, state: OrderState, at: DateTime<Utc>) {
        let slot = match state {
            OrderState::Confirmed => &mut self.confirmed_at,
            OrderState::Preparing => &mut self.preparing_at,
            OrderState::Terminated => &mut self.terminated_at,
            OrderState::Delivered => &mut self.delivered_at,
        };
        *slot = Some(at);
    }
}

/// Order entity (pedido)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "pedido_id")]
    pub id: OrderId,
    /// Table reference
    #[serde(rename = "mesa")]
    pub table_id: i64,
    #[serde(
        rename = "mesa_numero",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub table_number: Option<i32>,
    #[serde(rename = "platos", default)]
    pub lines: Vec<OrderLine>,
    #[serde(rename = "nota", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "estado")]
    pub state: OrderState,
    #[serde(flatten)]
    pub timestamps: StateTimestamps,
}

impl Order {
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Table label for alerts: number when known, id otherwise
    pub fn table_label(&self) -> String {
        match self.table_number {
            Some(n) => n.to_string(),
            None => self.table_id.to_string(),
        }
    }
}

/// New order line payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrderLine {
    #[serde(rename = "plato_id")]
    #[validate(range(min = 1, message = "dish id must be positive"))]
    pub dish_id: i64,
    #[serde(rename = "cantidad")]
    #[validate(range(min = 1, message = "quantity must be positive"))]
    pub quantity: u32,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrder {
    #[serde(rename = "mesa")]
    #[validate(range(min = 1, message = "table id must be positive"))]
    pub table_id: i64,
    #[serde(rename = "silla", default, skip_serializing_if = "Option::is_none")]
    pub seat_id: Option<i64>,
    #[serde(rename = "platos")]
    #[validate(length(min = 1, message = "order needs at least one dish"), nested)]
    pub lines: Vec<NewOrderLine>,
    #[serde(rename = "nota", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Order state change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStateUpdate {
    #[serde(rename = "estado")]
    pub state: OrderState,
}
