//! Worker Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Role, not_blank};

/// Restaurant worker (trabajador)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "rol")]
    pub role: Role,
}

/// Create worker payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WorkerCreate {
    #[serde(rename = "nombre")]
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password too short"))]
    pub password: String,
    #[serde(rename = "rol")]
    pub role: Role,
}

/// Update worker payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct WorkerUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(rename = "rol", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_worker_name_rejected() {
        let worker = WorkerCreate {
            name: "   ".into(),
            email: "luis@comanda.app".into(),
            password: "secreto".into(),
            role: Role::Waiter,
        };
        let errors = worker.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["name"][0].message.as_deref(), Some("name is required"));

        let update = WorkerUpdate {
            name: Some("\t".into()),
            ..Default::default()
        };
        assert!(update.validate().unwrap_err().field_errors().contains_key("name"));
        assert!(WorkerUpdate::default().validate().is_ok());
    }
}
