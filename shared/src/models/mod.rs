//! Data models
//!
//! Wire types of the restaurant backend. Rust field names are English; the
//! serde names follow the backend's Spanish JSON keys.

pub mod category;
pub mod dining_table;
pub mod dish;
pub mod order;
pub mod restaurant;
pub mod role;
pub mod worker;

// Re-exports
pub use category::*;
pub use dining_table::*;
pub use dish::*;
pub use order::*;
pub use restaurant::*;
pub use role::*;
pub use worker::*;

use validator::ValidationError;

/// Rejects empty and whitespace-only names
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
