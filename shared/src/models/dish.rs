//! Dish Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;

/// Dish entity (plato)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    /// Price in minor currency units
    #[serde(rename = "precio")]
    pub price: i64,
    #[serde(rename = "imagen", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock: i32,
    /// Category reference
    #[serde(rename = "categoria_id")]
    pub category_id: i64,
    #[serde(rename = "activo", default = "default_true")]
    pub is_active: bool,
}

impl Dish {
    /// Whether diners can order it right now
    pub fn is_orderable(&self) -> bool {
        self.is_active && self.stock > 0
    }
}

fn default_true() -> bool {
    true
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DishCreate {
    #[serde(rename = "nombre")]
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "precio")]
    #[validate(range(min = 1, message = "price must be positive"))]
    pub price: i64,
    #[serde(rename = "imagen", skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(range(min = 0, message = "stock cannot be negative"))]
    pub stock: i32,
    #[serde(rename = "categoria_id")]
    #[validate(range(min = 1, message = "category is required"))]
    pub category_id: i64,
}

/// Update dish payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DishUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "precio", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub price: Option<i64>,
    #[serde(rename = "imagen", skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    #[serde(rename = "categoria_id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(rename = "activo", skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dish_create_validation() {
        let dish = DishCreate {
            name: String::new(),
            description: String::new(),
            price: 0,
            image_url: Some("not a url".into()),
            stock: -1,
            category_id: 2,
        };
        let errors = dish.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("image_url"));
        assert!(fields.contains_key("stock"));
        assert!(!fields.contains_key("category_id"));
    }

    #[test]
    fn test_whitespace_name_is_blank() {
        let dish = DishCreate {
            name: "  \n ".into(),
            description: String::new(),
            price: 5900,
            image_url: None,
            stock: 10,
            category_id: 2,
        };
        let errors = dish.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
        assert!(errors.field_errors().contains_key("name"));

        let rename = DishUpdate {
            name: Some(" ".into()),
            ..Default::default()
        };
        assert!(rename.validate().is_err());
    }

    #[test]
    fn test_orderable() {
        let mut dish: Dish = serde_json::from_value(serde_json::json!({
            "id": 1, "nombre": "Empanada", "precio": 2500, "stock": 0, "categoria_id": 1
        }))
        .unwrap();
        assert!(dish.is_active);
        assert!(!dish.is_orderable());
        dish.stock = 4;
        assert!(dish.is_orderable());
    }
}
