//! Error types for the shared crate
//!
//! Decode errors for lifecycle codes and server events, plus the backend's
//! failure body.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::order::OrderState;

/// Lifecycle decode / transition error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Integer code outside the known range
    #[error("Unknown order state code: {0}")]
    UnknownCode(i64),

    /// String tag with no known mapping
    #[error("Unknown order state tag: {0}")]
    UnknownTag(String),

    /// Transition that does not move forward
    #[error("Order state cannot go from {from} to {to}")]
    BackwardTransition { from: OrderState, to: OrderState },
}

/// WebSocket frame decode error
#[derive(Debug, Error)]
pub enum EventError {
    /// Not JSON, or a known event with missing/invalid fields
    #[error("Malformed event frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// JSON object without an `evento` string
    #[error("Event frame has no 'evento' tag")]
    MissingTag,

    /// Tag the client does not understand
    #[error("Unknown event: {0}")]
    UnknownEvent(String),
}

/// Validation item in a `detail` list (FastAPI style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailItem {
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
}

/// `detail` is either a plain message or a list of validation items
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Detail {
    Message(String),
    Items(Vec<DetailItem>),
}

/// Backend failure body: `{ "detail": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: Detail,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            detail: Detail::Message(message.into()),
        }
    }

    /// Flatten the detail into one human-readable line
    pub fn message(&self) -> String {
        match &self.detail {
            Detail::Message(msg) => msg.clone(),
            Detail::Items(items) => items
                .iter()
                .map(|item| {
                    let field = item
                        .loc
                        .iter()
                        .filter_map(|v| match v {
                            serde_json::Value::String(s) if s != "body" => Some(s.clone()),
                            serde_json::Value::Number(n) => Some(n.to_string()),
                            _ => None,
                        })
                        .collect::<Vec<_>>()
                        .join(".");
                    if field.is_empty() {
                        item.msg.clone()
                    } else {
                        format!("{}: {}", field, item.msg)
                    }
                })
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_message() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"detail":"Mesa no encontrada"}"#).unwrap();
        assert_eq!(body.message(), "Mesa no encontrada");
    }

    #[test]
    fn test_detail_items_are_flattened() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"detail":[
                {"loc":["body","precio"],"msg":"must be positive"},
                {"loc":["body","platos",0,"cantidad"],"msg":"required"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            body.message(),
            "precio: must be positive; platos.0.cantidad: required"
        );
    }
}
