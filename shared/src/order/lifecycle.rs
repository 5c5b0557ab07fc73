//! Order lifecycle bridge
//!
//! The backend reports order state either as a small integer code or as a
//! string tag. Both decode into [`OrderState`]; the client always emits the
//! tag. Transitions only move forward:
//!
//! ```text
//! confirmado(1) -> en_preparacion(2) -> terminado(3) -> entregado(4)
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::LifecycleError;

/// Order lifecycle state (estado del pedido)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderState {
    /// Accepted by the restaurant
    Confirmed,
    /// In the kitchen
    Preparing,
    /// Ready for delivery
    Terminated,
    Delivered,
}

/// Client-visible bucket of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateBucket {
    /// Kitchen queue (confirmed or in preparation)
    Preparing,
    /// Waiter queue (ready for delivery)
    Terminated,
    Delivered,
}

impl OrderState {
    pub const ALL: [OrderState; 4] = [
        OrderState::Confirmed,
        OrderState::Preparing,
        OrderState::Terminated,
        OrderState::Delivered,
    ];

    /// Decode a backend integer code
    pub fn from_code(code: i64) -> Result<Self, LifecycleError> {
        match code {
            1 => Ok(Self::Confirmed),
            2 => Ok(Self::Preparing),
            3 => Ok(Self::Terminated),
            4 => Ok(Self::Delivered),
            other => Err(LifecycleError::UnknownCode(other)),
        }
    }

    /// Decode a backend string tag (case-insensitive, a few legacy aliases)
    pub fn from_tag(tag: &str) -> Result<Self, LifecycleError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "confirmado" | "confirmed" => Ok(Self::Confirmed),
            "en_preparacion" | "preparando" | "preparing" => Ok(Self::Preparing),
            "terminado" | "terminated" => Ok(Self::Terminated),
            "entregado" | "delivered" => Ok(Self::Delivered),
            _ => Err(LifecycleError::UnknownTag(tag.to_string())),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Confirmed => 1,
            Self::Preparing => 2,
            Self::Terminated => 3,
            Self::Delivered => 4,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmado",
            Self::Preparing => "en_preparacion",
            Self::Terminated => "terminado",
            Self::Delivered => "entregado",
        }
    }

    pub fn bucket(self) -> StateBucket {
        match self {
            Self::Confirmed | Self::Preparing => StateBucket::Preparing,
            Self::Terminated => StateBucket::Terminated,
            Self::Delivered => StateBucket::Delivered,
        }
    }

    /// Whether `next` is strictly ahead of `self`
    pub fn can_advance_to(self, next: OrderState) -> bool {
        next > self
    }

    /// Validate a transition, rejecting anything that is not forward
    pub fn advance(self, next: OrderState) -> Result<OrderState, LifecycleError> {
        if self.can_advance_to(next) {
            Ok(next)
        } else {
            Err(LifecycleError::BackwardTransition {
                from: self,
                to: next,
            })
        }
    }

    /// The state that normally follows this one
    pub fn next(self) -> Option<OrderState> {
        match self {
            Self::Confirmed => Some(Self::Preparing),
            Self::Preparing => Some(Self::Terminated),
            Self::Terminated => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    pub fn is_final(self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for OrderState {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
            Ok(code) => Self::from_code(code),
            Err(_) => Self::from_tag(s),
        }
    }
}

impl Serialize for OrderState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for OrderState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(i64),
            Tag(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => Self::from_code(code),
            Raw::Tag(tag) => Self::from_tag(&tag),
        }
        .map_err(serde::de::Error::custom)
    }
}
