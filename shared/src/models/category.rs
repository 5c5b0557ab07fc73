//! Category Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;

/// Menu category entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "imagen", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "orden", default)]
    pub sort_order: i32,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryCreate {
    #[serde(rename = "nombre")]
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub name: String,
    #[serde(rename = "imagen", skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(rename = "orden", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CategoryUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[serde(rename = "imagen", skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(rename = "orden", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_name_must_have_text() {
        let blank = CategoryCreate {
            name: " ".into(),
            image_url: None,
            sort_order: None,
        };
        assert!(blank.validate().unwrap_err().field_errors().contains_key("name"));

        let named = CategoryCreate {
            name: "Postres".into(),
            ..blank
        };
        assert!(named.validate().is_ok());
    }
}
