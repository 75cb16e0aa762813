//! The persisted catalog document and the records it holds.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Identifier of a product record.
pub type ProductId = u64;

/// Identifier of a user record.
pub type UserId = u64;

/// A product record.
///
/// The known fields are typed; anything else a caller supplies is kept in
/// `extra` in insertion order and flattened back into the same JSON object.
/// Serialized field order is `id`, `name`, `description`, `price`, then
/// the extra fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(
        default,
        serialize_with = "serialize_number",
        deserialize_with = "lenient_number"
    )]
    pub price: f64,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Product {
    /// Create an empty product with the given id and default fields.
    pub fn new(id: ProductId) -> Self {
        Self {
            id,
            name: String::new(),
            description: String::new(),
            price: 0.0,
            extra: IndexMap::new(),
        }
    }

    /// Current value of a field as JSON, or `None` if the record has no
    /// such field.
    pub fn field(&self, key: &str) -> Option<Value> {
        match key {
            "id" => Some(Value::from(self.id)),
            "name" => Some(Value::String(self.name.clone())),
            "description" => Some(Value::String(self.description.clone())),
            "price" => Some(number_value(self.price)),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Text searched by catalog queries: name and description joined by a
    /// single space.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }
}

/// A registered user. The password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(rename = "passwordHash")]
    pub password_hash: String,
}

/// The complete persisted state: products, users and their id counters.
///
/// Missing keys default on load so documents written before users existed
/// still open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default = "first_id")]
    pub next_id: ProductId,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default = "first_id")]
    pub next_user_id: UserId,
}

impl Default for CatalogDocument {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            next_id: first_id(),
            users: Vec::new(),
            next_user_id: first_id(),
        }
    }
}

impl CatalogDocument {
    /// Hand out the next product id and advance the counter.
    ///
    /// The counter never goes backwards and never lands on an id that is
    /// already taken, even if the stored counter was edited by hand.
    pub fn allocate_product_id(&mut self) -> ProductId {
        let floor = self.products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let id = self.next_id.max(floor);
        self.next_id = id + 1;
        id
    }

    /// Hand out the next user id and advance the counter.
    pub fn allocate_user_id(&mut self) -> UserId {
        let floor = self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let id = self.next_user_id.max(floor);
        self.next_user_id = id + 1;
        id
    }

    /// Position of a product in store order.
    pub fn product_index(&self, id: ProductId) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }
}

fn first_id() -> u64 {
    1
}

/// Render a float as a JSON number, using an integer representation when
/// the value has no fractional part.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Coerce an arbitrary JSON value to a number.
///
/// Numbers pass through, booleans count as 1/0, and strings are parsed
/// directly or, failing that, after stripping everything except digits,
/// `.` and `-` (so a legacy value such as `"+=15"` reads as 15). Anything
/// that still does not parse counts as 0.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::String(s)) => parse_number_text(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn parse_number_text(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        return n.is_finite().then_some(n);
    }
    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Text form of a JSON value as stored in a text field.
pub fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn serialize_number<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    number_value(*n).serialize(serializer)
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(|v| text_value(&v))
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Value::deserialize(deserializer).map(|v| coerce_number(Some(&v)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_serializes_first() {
        let mut product = Product::new(7);
        product.extra.insert("color".into(), json!("red"));
        let text = serde_json::to_string(&product).unwrap();
        assert!(text.starts_with("{\"id\":7"));
        assert!(text.ends_with("\"color\":\"red\"}"));
    }

    #[test]
    fn test_integral_price_serializes_as_integer() {
        let mut product = Product::new(1);
        product.price = 15.0;
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["price"], json!(15));

        product.price = 9.5;
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["price"], json!(9.5));
    }

    #[test]
    fn test_extra_fields_keep_insertion_order() {
        let doc: Product = serde_json::from_value(json!({
            "id": 3,
            "name": "Lamp",
            "zeta": 1,
            "alpha": 2,
            "price": 4
        }))
        .unwrap();
        let keys: Vec<&str> = doc.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(doc.description, "");
    }

    #[test]
    fn test_legacy_values_load_leniently() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "name": 42,
            "price": "+=15"
        }))
        .unwrap();
        assert_eq!(product.name, "42");
        assert_eq!(product.price, 15.0);
    }

    #[test]
    fn test_document_defaults_missing_keys() {
        let doc: CatalogDocument = serde_json::from_str(r#"{"products": []}"#).unwrap();
        assert_eq!(doc.next_id, 1);
        assert_eq!(doc.next_user_id, 1);
        assert!(doc.users.is_empty());
    }

    #[test]
    fn test_document_uses_camel_case_keys() {
        let value = serde_json::to_value(CatalogDocument::default()).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["products", "nextId", "users", "nextUserId"]);
    }

    #[test]
    fn test_allocate_skips_taken_ids() {
        let mut doc = CatalogDocument::default();
        doc.products.push(Product::new(5));
        doc.next_id = 2;
        assert_eq!(doc.allocate_product_id(), 6);
        assert_eq!(doc.next_id, 7);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(Some(&json!(2.5))), 2.5);
        assert_eq!(coerce_number(Some(&json!("12"))), 12.0);
        assert_eq!(coerce_number(Some(&json!("$12.50"))), 12.5);
        assert_eq!(coerce_number(Some(&json!("n/a"))), 0.0);
        assert_eq!(coerce_number(Some(&json!(true))), 1.0);
        assert_eq!(coerce_number(Some(&json!(null))), 0.0);
        assert_eq!(coerce_number(None), 0.0);
    }
}
