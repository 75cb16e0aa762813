//! Batch field updates: one set of field changes applied to many products.
//!
//! Each supplied value is parsed once into a [`FieldUpdate`]:
//!
//! - `"+=10"`, `"-= 5.5"` shift the record's current value ([`FieldUpdate::Relative`])
//! - `"19.99"` sets a number on numeric fields and text elsewhere ([`FieldUpdate::Absolute`])
//! - anything else is assigned as given ([`FieldUpdate::Verbatim`]),
//!   including digit strings too large for an `f64`
//!
//! `id` is never updated. `price` is the only field validated up front: a
//! batch whose `price` is not numeric in one of the forms above is
//! rejected before any record is touched.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::store::{coerce_number, number_value, Product};

use super::error::ProductError;
use super::payload::{assign, parse_decimal, ProductPayload};

#[allow(clippy::expect_used)]
fn relative_pattern() -> &'static Regex {
    static RELATIVE: OnceLock<Regex> = OnceLock::new();
    RELATIVE.get_or_init(|| {
        Regex::new(r"^([+-])=\s*(\d+(?:\.\d+)?)$").expect("valid relative update regex")
    })
}

/// Direction of a relative update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeOp {
    Add,
    Subtract,
}

impl RelativeOp {
    pub fn apply(self, current: f64, delta: f64) -> f64 {
        match self {
            RelativeOp::Add => current + delta,
            RelativeOp::Subtract => current - delta,
        }
    }
}

/// A single field change within a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Shift the current value, coerced to a number, by `delta`.
    Relative { op: RelativeOp, delta: f64 },
    /// A string holding a decimal number. `price` and fields currently
    /// holding a number receive `value`; other fields receive `text`.
    Absolute { value: f64, text: String },
    /// Assigned exactly as supplied.
    Verbatim(Value),
}

impl FieldUpdate {
    /// Classify a raw JSON value.
    pub fn parse(value: Value) -> Self {
        let Value::String(text) = value else {
            return Self::Verbatim(value);
        };

        if let Some(caps) = relative_pattern().captures(&text) {
            let op = match caps.get(1).map(|m| m.as_str()) {
                Some("-") => RelativeOp::Subtract,
                _ => RelativeOp::Add,
            };
            let delta = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .filter(|d| d.is_finite());
            if let Some(delta) = delta {
                return Self::Relative { op, delta };
            }
        }

        match parse_decimal(&text) {
            Some(value) => Self::Absolute { value, text },
            None => Self::Verbatim(Value::String(text)),
        }
    }

    /// Whether this update is guaranteed to produce a number.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Relative { .. } | Self::Absolute { .. } | Self::Verbatim(Value::Number(_))
        )
    }

    /// The value `key` takes on `product` after this update. Fails if a
    /// relative change leaves the range of `f64`.
    fn resolve(&self, product: &Product, key: &str) -> Result<Value, ProductError> {
        let value = match self {
            Self::Relative { op, delta } => {
                let current = coerce_number(product.field(key).as_ref());
                let next = op.apply(current, *delta);
                if !next.is_finite() {
                    return Err(ProductError::invalid_update(
                        key,
                        format!("result of changing {} by {} is out of range", current, delta),
                    ));
                }
                number_value(next)
            }
            Self::Absolute { value, text } => {
                let numeric_target =
                    key == "price" || matches!(product.field(key), Some(Value::Number(_)));
                if numeric_target {
                    number_value(*value)
                } else {
                    Value::String(text.clone())
                }
            }
            Self::Verbatim(value) => value.clone(),
        };
        Ok(value)
    }
}

/// A validated set of field changes, ready to apply to any number of
/// products.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchUpdate {
    fields: IndexMap<String, FieldUpdate>,
}

impl BatchUpdate {
    /// Parse and validate raw update fields. Fails with
    /// [`ProductError::InvalidUpdate`] if `price` is present but not
    /// numeric.
    pub fn parse(update: ProductPayload) -> Result<Self, ProductError> {
        let fields: IndexMap<String, FieldUpdate> = update
            .into_iter()
            .filter(|(key, _)| key != "id")
            .map(|(key, value)| (key, FieldUpdate::parse(value)))
            .collect();

        if let Some(price) = fields.get("price") {
            if !price.is_numeric() {
                return Err(ProductError::invalid_update(
                    "price",
                    "expected a number, a decimal string, or a relative change such as \"+=10\"",
                ));
            }
        }

        Ok(Self { fields })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, key: &str) -> Option<&FieldUpdate> {
        self.fields.get(key)
    }

    /// Apply every field change to one product, in the order supplied.
    ///
    /// `price` is typed as a number on the record, so it always comes out
    /// normalized.
    pub fn apply_to(&self, product: &mut Product) -> Result<(), ProductError> {
        for (key, update) in &self.fields {
            let value = update.resolve(product, key)?;
            assign(product, key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn batch(update: Value) -> Result<BatchUpdate, ProductError> {
        BatchUpdate::parse(serde_json::from_value(update).unwrap())
    }

    #[test]
    fn test_parse_relative() {
        assert_eq!(
            FieldUpdate::parse(json!("+=10")),
            FieldUpdate::Relative { op: RelativeOp::Add, delta: 10.0 }
        );
        assert_eq!(
            FieldUpdate::parse(json!("-=  5.5")),
            FieldUpdate::Relative { op: RelativeOp::Subtract, delta: 5.5 }
        );
    }

    #[test]
    fn test_parse_absolute_and_verbatim() {
        assert_eq!(
            FieldUpdate::parse(json!("19.99")),
            FieldUpdate::Absolute { value: 19.99, text: "19.99".into() }
        );
        assert_eq!(
            FieldUpdate::parse(json!("-3")),
            FieldUpdate::Absolute { value: -3.0, text: "-3".into() }
        );
        assert_eq!(FieldUpdate::parse(json!("+=")), FieldUpdate::Verbatim(json!("+=")));
        assert_eq!(FieldUpdate::parse(json!("*=2")), FieldUpdate::Verbatim(json!("*=2")));
        assert_eq!(FieldUpdate::parse(json!(7)), FieldUpdate::Verbatim(json!(7)));
        assert_eq!(FieldUpdate::parse(json!(false)), FieldUpdate::Verbatim(json!(false)));
    }

    #[test]
    fn test_price_prevalidation() {
        assert!(batch(json!({"price": "+=5"})).is_ok());
        assert!(batch(json!({"price": "12"})).is_ok());
        assert!(batch(json!({"price": 12.5})).is_ok());

        for bad in [json!(true), json!("cheap"), json!(null), json!({"v": 1})] {
            let err = batch(json!({"price": bad})).unwrap_err();
            assert!(matches!(err, ProductError::InvalidUpdate { ref field, .. } if field == "price"));
        }
    }

    #[test]
    fn test_other_fields_are_not_prevalidated() {
        let update = batch(json!({"name": true, "stock": "lots"})).unwrap();
        assert_eq!(update.len(), 2);
    }

    #[test]
    fn test_id_is_dropped() {
        let update = batch(json!({"id": 50, "name": "x"})).unwrap();
        assert!(update.get("id").is_none());

        let mut product = Product::new(3);
        update.apply_to(&mut product).unwrap();
        assert_eq!(product.id, 3);
    }

    #[test]
    fn test_relative_on_text_field_extracts_number() {
        let mut product = Product::new(1);
        product.extra.insert("stock".into(), json!("12 units"));
        batch(json!({"stock": "+=3"})).unwrap().apply_to(&mut product).unwrap();
        assert_eq!(product.extra.get("stock"), Some(&json!(15)));
    }

    #[test]
    fn test_relative_on_missing_field_starts_from_zero() {
        let mut product = Product::new(1);
        batch(json!({"stock": "-=2"})).unwrap().apply_to(&mut product).unwrap();
        assert_eq!(product.extra.get("stock"), Some(&json!(-2)));
    }

    #[test]
    fn test_absolute_respects_field_type() {
        let mut product = Product::new(1);
        product.extra.insert("stock".into(), json!(4));
        product.extra.insert("sku".into(), json!("A-1"));

        batch(json!({"stock": "9", "sku": "42", "price": "3.5"}))
            .unwrap()
            .apply_to(&mut product)
            .unwrap();

        assert_eq!(product.extra.get("stock"), Some(&json!(9)));
        assert_eq!(product.extra.get("sku"), Some(&json!("42")));
        assert_eq!(product.price, 3.5);
    }

    #[test]
    fn test_verbatim_preserves_type() {
        let mut product = Product::new(1);
        batch(json!({"featured": true, "tags": ["a", "b"]}))
            .unwrap()
            .apply_to(&mut product)
            .unwrap();
        assert_eq!(product.extra.get("featured"), Some(&json!(true)));
        assert_eq!(product.extra.get("tags"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn test_overflowing_numbers_are_not_numeric() {
        let huge = "9".repeat(400);

        let relative = FieldUpdate::parse(Value::String(format!("+={}", huge)));
        assert_eq!(relative, FieldUpdate::Verbatim(Value::String(format!("+={}", huge))));
        assert!(!relative.is_numeric());

        let absolute = FieldUpdate::parse(Value::String(huge.clone()));
        assert_eq!(absolute, FieldUpdate::Verbatim(Value::String(huge.clone())));

        let err = batch(json!({"price": format!("+={}", huge)})).unwrap_err();
        assert!(matches!(err, ProductError::InvalidUpdate { ref field, .. } if field == "price"));
        let err = batch(json!({"price": huge})).unwrap_err();
        assert!(matches!(err, ProductError::InvalidUpdate { ref field, .. } if field == "price"));
    }

    #[test]
    fn test_overflowing_text_field_keeps_the_string() {
        let huge = format!("+={}", "9".repeat(400));
        let mut product = Product::new(1);
        product.extra.insert("stock".into(), json!(4));

        batch(json!({"stock": huge.clone()})).unwrap().apply_to(&mut product).unwrap();
        assert_eq!(product.extra.get("stock"), Some(&Value::String(huge)));
    }

    #[test]
    fn test_relative_result_out_of_range_fails() {
        let mut product = Product::new(1);
        product.price = f64::MAX;
        let delta = format!("+={}", "9".repeat(308));

        let err = batch(json!({"price": delta})).unwrap().apply_to(&mut product).unwrap_err();
        assert!(matches!(err, ProductError::InvalidUpdate { ref field, .. } if field == "price"));
        assert_eq!(product.price, f64::MAX);
    }

    proptest! {
        #[test]
        fn prop_add_then_subtract_restores_price(start in 0u32..100_000, delta in 0u32..10_000) {
            let mut product = Product::new(1);
            product.price = f64::from(start);

            batch(json!({"price": format!("+={}", delta)})).unwrap().apply_to(&mut product).unwrap();
            prop_assert_eq!(product.price, f64::from(start) + f64::from(delta));

            batch(json!({"price": format!("-= {}", delta)})).unwrap().apply_to(&mut product).unwrap();
            prop_assert_eq!(product.price, f64::from(start));
        }
    }
}
