//! Shared types for the Comanda restaurant client
//!
//! Wire models of the restaurant backend, the order lifecycle bridge and the
//! typed WebSocket events. Used by `comanda-client` and its tools.

pub mod client;
pub mod error;
pub mod event;
pub mod models;
pub mod order;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiErrorBody, EventError, LifecycleError};
pub use event::ServerEvent;
pub use models::{Order, OrderId};
pub use order::{OrderState, StateBucket};
