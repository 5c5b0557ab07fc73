//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend refused the payload (400 / 422)
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// Any other non-success status
    #[error("API error {status}: {detail}")]
    Api { status: u16, detail: String },

    /// Client-side validation failed before submission
    #[error("Validation error: {0}")]
    Validation(String),

    /// Local lifecycle rule violated (e.g. backward transition)
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] shared::LifecycleError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Caught before the request left the client
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Lifecycle(_))
    }

    /// Network or parse failure, as opposed to a validation failure
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_) | Self::InvalidResponse(_))
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reasons = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{field}: {reasons}")
            })
            .collect();
        if fields.is_empty() {
            fields.push(errors.to_string());
        }
        fields.sort();
        Self::Validation(fields.join("; "))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let invalid = ClientError::InvalidResponse("truncated body".into());
        assert!(invalid.is_network());
        assert!(!invalid.is_validation());

        let lifecycle = ClientError::from(shared::LifecycleError::UnknownCode(9));
        assert!(lifecycle.is_validation());
        assert!(!lifecycle.is_network());

        let rejected = ClientError::Rejected("precio: must be positive".into());
        assert!(!rejected.is_network());
        assert!(!rejected.is_validation());
    }
}
