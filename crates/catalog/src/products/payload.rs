//! Assigning caller-supplied field values onto typed product records.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::store::{text_value, Product};

use super::error::ProductError;

/// Partial product fields as supplied by a caller, in the order given.
pub type ProductPayload = IndexMap<String, Value>;

/// Matches a string holding a plain decimal number, e.g. `19.99` or `-3`.
#[allow(clippy::expect_used)]
pub(crate) fn decimal_pattern() -> &'static Regex {
    static DECIMAL: OnceLock<Regex> = OnceLock::new();
    DECIMAL.get_or_init(|| Regex::new(r"^-?\d+(?:\.\d+)?$").expect("valid decimal regex"))
}

/// Parse a string that holds nothing but a decimal number. Digit strings
/// too long to fit an `f64` are not numbers.
pub(crate) fn parse_decimal(text: &str) -> Option<f64> {
    if decimal_pattern().is_match(text) {
        text.parse().ok().filter(|n: &f64| n.is_finite())
    } else {
        None
    }
}

/// Set one field of `product` from a JSON value.
///
/// `id` is never assignable and is skipped. Text fields store the text
/// form of whatever they are given. `price` accepts a number or a decimal
/// string; `null` leaves it unchanged. Unknown keys are kept verbatim.
pub(crate) fn assign(product: &mut Product, key: &str, value: Value) -> Result<(), ProductError> {
    match key {
        "id" => {}
        "name" => product.name = text_value(&value),
        "description" => product.description = text_value(&value),
        "price" => match value {
            Value::Null => {}
            Value::Number(n) => {
                product.price = n
                    .as_f64()
                    .ok_or_else(|| ProductError::invalid_update(key, "price is out of range"))?;
            }
            Value::String(s) => {
                product.price = parse_decimal(s.trim()).ok_or_else(|| {
                    ProductError::invalid_update(key, format!("'{}' is not a number", s))
                })?;
            }
            other => {
                return Err(ProductError::invalid_update(
                    key,
                    format!("expected a number, got {}", other),
                ));
            }
        },
        _ => {
            product.extra.insert(key.to_string(), value);
        }
    }
    Ok(())
}

/// Merge every payload field into `product`, skipping `id`.
pub(crate) fn merge(product: &mut Product, payload: ProductPayload) -> Result<(), ProductError> {
    payload
        .into_iter()
        .filter(|(key, _)| key != "id")
        .try_for_each(|(key, value)| assign(product, &key, value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_keeps_unprovided_fields() {
        let mut product = Product::new(1);
        product.name = "Lamp".into();
        product.price = 20.0;

        let payload: ProductPayload =
            serde_json::from_value(json!({"price": "12.5", "color": "red"})).unwrap();
        merge(&mut product, payload).unwrap();

        assert_eq!(product.name, "Lamp");
        assert_eq!(product.price, 12.5);
        assert_eq!(product.extra.get("color"), Some(&json!("red")));
    }

    #[test]
    fn test_merge_ignores_id() {
        let mut product = Product::new(4);
        let payload: ProductPayload = serde_json::from_value(json!({"id": 99})).unwrap();
        merge(&mut product, payload).unwrap();
        assert_eq!(product.id, 4);
        assert!(product.extra.is_empty());
    }

    #[test]
    fn test_non_numeric_price_is_rejected() {
        let mut product = Product::new(1);
        for bad in [json!("cheap"), json!(true), json!([1]), json!("+=5")] {
            let err = assign(&mut product, "price", bad).unwrap_err();
            assert!(matches!(err, ProductError::InvalidUpdate { .. }));
        }
        assert_eq!(product.price, 0.0);
    }

    #[test]
    fn test_overflowing_price_is_rejected() {
        let mut product = Product::new(1);
        product.price = 10.0;
        let huge = "9".repeat(400);
        let err = assign(&mut product, "price", Value::String(huge)).unwrap_err();
        assert!(matches!(err, ProductError::InvalidUpdate { .. }));
        assert_eq!(product.price, 10.0);
    }

    #[test]
    fn test_text_fields_take_text_form() {
        let mut product = Product::new(1);
        assign(&mut product, "name", json!(15)).unwrap();
        assign(&mut product, "description", json!(null)).unwrap();
        assert_eq!(product.name, "15");
        assert_eq!(product.description, "");
    }
}
