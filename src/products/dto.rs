use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::FieldError;

/// Body for product create and update. PUT replaces all mutable fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductBody {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    pub brand: String,
}

impl ProductBody {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "name is required"));
        }
        if self.price <= Decimal::ZERO {
            errors.push(FieldError::new("price", "price must be positive"));
        }
        if self.brand.trim().is_empty() {
            errors.push(FieldError::new("brand", "brand is required"));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn valid_body() -> ProductBody {
        ProductBody {
            name: "Widget".into(),
            price: dec("9.99"),
            description: Some("A widget".into()),
            brand: "Acme".into(),
        }
    }

    #[test]
    fn valid_body_has_no_errors() {
        assert!(valid_body().validate().is_empty());
    }

    #[test]
    fn blank_name_and_brand_are_rejected() {
        let mut body = valid_body();
        body.name = "  ".into();
        body.brand = String::new();
        let errors = body.validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "brand"]);
    }

    #[test]
    fn zero_and_negative_prices_are_rejected() {
        let mut body = valid_body();
        body.price = Decimal::ZERO;
        assert_eq!(body.validate()[0].field, "price");
        body.price = dec("-1.50");
        assert_eq!(body.validate()[0].field, "price");
    }

    #[test]
    fn description_is_optional() {
        let body: ProductBody =
            serde_json::from_str(r#"{"name":"Widget","price":9.99,"brand":"Acme"}"#).unwrap();
        assert!(body.description.is_none());
        assert!(body.validate().is_empty());
    }
}
