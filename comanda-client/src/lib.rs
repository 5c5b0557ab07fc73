//! Comanda Client - restaurant backend client
//!
//! REST calls, the stored session, the diner cart and the live order
//! notification listener that feeds the kitchen and waiter boards.

pub mod board;
pub mod cart;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod session;

pub use board::{Detail, OrderBoard, PendingEntry, StateUpdate};
pub use cart::Cart;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{OrderSource, RestClient};
pub use notify::{
    Alert, ConnectionState, ListenerError, ListenerHandle, NotificationListener, ReconnectPolicy,
    StopReason, WsFrameSource,
};
pub use session::{JsonFileStore, KeyValueStore, MemoryStore, SeatLink, Session, SessionStore};

// Re-export shared types for convenience
pub use shared::client::LoginResponse;
pub use shared::{Order, OrderId, OrderState, ServerEvent};
