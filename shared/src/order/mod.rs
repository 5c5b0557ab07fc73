//! Order lifecycle types

pub mod lifecycle;

pub use lifecycle::{OrderState, StateBucket};
