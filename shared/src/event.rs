//! Server events pushed over the per-restaurant WebSocket
//!
//! Every frame is a JSON object discriminated by `evento`:
//!
//! | evento | payload |
//! |--------|---------|
//! | `nuevo_pedido` | `pedido_id` |
//! | `pedido_terminado` | `pedido_id` |
//! | `pedido_actualizado` | `pedido_id`, `estado` |
//! | `solicitud_cliente` | `mesa`, `tipo?`, `mensaje?` |
//! | `actualizar_mesa` | `mesa_id`, `estado` |

use serde::{Deserialize, Serialize};

use crate::error::EventError;
use crate::models::{OrderId, TableState};
use crate::order::OrderState;

/// Known `evento` tags
pub const EVENT_TAGS: [&str; 5] = [
    "nuevo_pedido",
    "pedido_terminado",
    "pedido_actualizado",
    "solicitud_cliente",
    "actualizar_mesa",
];

/// Decoded server event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "evento")]
pub enum ServerEvent {
    /// A diner placed an order
    #[serde(rename = "nuevo_pedido")]
    NewOrder {
        #[serde(rename = "pedido_id")]
        order_id: OrderId,
    },

    /// Kitchen finished an order, ready for delivery
    #[serde(rename = "pedido_terminado")]
    OrderTerminated {
        #[serde(rename = "pedido_id")]
        order_id: OrderId,
    },

    #[serde(rename = "pedido_actualizado")]
    OrderUpdated {
        #[serde(rename = "pedido_id")]
        order_id: OrderId,
        #[serde(rename = "estado")]
        state: OrderState,
    },

    /// A diner asks for attention (call waiter, ask for the bill, ...)
    #[serde(rename = "solicitud_cliente")]
    CustomerRequest {
        #[serde(rename = "mesa")]
        table: i64,
        #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        #[serde(rename = "mensaje", default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    #[serde(rename = "actualizar_mesa")]
    TableUpdated {
        #[serde(rename = "mesa_id")]
        table_id: i64,
        #[serde(rename = "estado")]
        state: TableState,
    },
}

impl ServerEvent {
    /// Decode one text frame.
    ///
    /// Unknown tags are reported separately from malformed frames so the
    /// listener can tell "newer backend" apart from "broken payload".
    pub fn decode(text: &str) -> Result<Self, EventError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let tag = value
            .get("evento")
            .and_then(serde_json::Value::as_str)
            .ok_or(EventError::MissingTag)?;

        if !EVENT_TAGS.contains(&tag) {
            return Err(EventError::UnknownEvent(tag.to_string()));
        }

        Ok(serde_json::from_value(value)?)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Wire tag of this event
    pub fn tag(&self) -> &'static str {
        match self {
            Self::NewOrder { .. } => "nuevo_pedido",
            Self::OrderTerminated { .. } => "pedido_terminado",
            Self::OrderUpdated { .. } => "pedido_actualizado",
            Self::CustomerRequest { .. } => "solicitud_cliente",
            Self::TableUpdated { .. } => "actualizar_mesa",
        }
    }

    pub fn order_id(&self) -> Option<&OrderId> {
        match self {
            Self::NewOrder { order_id }
            | Self::OrderTerminated { order_id }
            | Self::OrderUpdated { order_id, .. } => Some(order_id),
            Self::CustomerRequest { .. } | Self::TableUpdated { .. } => None,
        }
    }
}

/// Human-readable text for a customer request
pub fn describe_request(table: i64, kind: Option<&str>, message: Option<&str>) -> String {
    let what = match kind {
        Some("llamar_garzon") | None => "calls the waiter".to_string(),
        Some("pedir_cuenta") => "asks for the bill".to_string(),
        Some(other) => other.replace('_', " "),
    };
    match message {
        Some(msg) if !msg.trim().is_empty() => format!("Table {table} {what}: {msg}"),
        _ => format!("Table {table} {what}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_new_order() {
        let event = ServerEvent::decode(r#"{"evento":"nuevo_pedido","pedido_id":"42"}"#).unwrap();
        assert_eq!(
            event,
            ServerEvent::NewOrder {
                order_id: OrderId::new("42"),
            }
        );
        assert_eq!(event.tag(), "nuevo_pedido");
    }

    #[test]
    fn test_decode_numeric_id_and_state_code() {
        let event =
            ServerEvent::decode(r#"{"evento":"pedido_actualizado","pedido_id":7,"estado":4}"#)
                .unwrap();
        assert_eq!(
            event,
            ServerEvent::OrderUpdated {
                order_id: OrderId::new("7"),
                state: OrderState::Delivered,
            }
        );
    }

    #[test]
    fn test_decode_customer_request_and_table() {
        let event = ServerEvent::decode(
            r#"{"evento":"solicitud_cliente","mesa":5,"tipo":"llamar_garzon"}"#,
        )
        .unwrap();
        assert!(matches!(
            event,
            ServerEvent::CustomerRequest { table: 5, .. }
        ));
        assert_eq!(event.order_id(), None);

        let event =
            ServerEvent::decode(r#"{"evento":"actualizar_mesa","mesa_id":2,"estado":"pagada"}"#)
                .unwrap();
        assert_eq!(
            event,
            ServerEvent::TableUpdated {
                table_id: 2,
                state: TableState::Paid,
            }
        );
    }

    #[test]
    fn test_decode_errors_are_distinct() {
        assert!(matches!(
            ServerEvent::decode("not json"),
            Err(EventError::Malformed(_))
        ));
        assert!(matches!(
            ServerEvent::decode(r#"{"pedido_id":"1"}"#),
            Err(EventError::MissingTag)
        ));
        assert!(matches!(
            ServerEvent::decode(r#"{"evento":"pago_recibido","pedido_id":"1"}"#),
            Err(EventError::UnknownEvent(tag)) if tag == "pago_recibido"
        ));
        // Known tag, missing field
        assert!(matches!(
            ServerEvent::decode(r#"{"evento":"pedido_terminado"}"#),
            Err(EventError::Malformed(_))
        ));
        // Known tag, unknown lifecycle code
        assert!(matches!(
            ServerEvent::decode(r#"{"evento":"pedido_actualizado","pedido_id":"1","estado":99}"#),
            Err(EventError::Malformed(_))
        ));
    }

    #[test]
    fn test_encode_matches_wire_shape() {
        let event = ServerEvent::OrderTerminated {
            order_id: OrderId::new("9"),
        };
        let value: serde_json::Value = serde_json::from_str(&event.encode().unwrap()).unwrap();
        assert_eq!(value["evento"], "pedido_terminado");
        assert_eq!(value["pedido_id"], "9");
    }

    #[test]
    fn test_describe_request() {
        assert_eq!(describe_request(4, None, None), "Table 4 calls the waiter");
        assert_eq!(
            describe_request(4, Some("pedir_cuenta"), Some("con tarjeta")),
            "Table 4 asks for the bill: con tarjeta"
        );
    }
}
