//! Request body extraction.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use catalog::ProductId;

use super::error::ApiError;

/// JSON body extractor that falls back to `T::default()` when the body is
/// empty or does not parse, instead of rejecting the request.
///
/// Admin clients routinely send bodies without a content type or with
/// partial shapes; validation of the fields themselves is left to the
/// operation being called.
pub struct LenientJson<T>(pub T);

impl<S, T> FromRequest<S> for LenientJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_body(e.status(), e.body_text()))?;

        if body.is_empty() {
            return Ok(Self(T::default()));
        }

        match serde_json::from_slice(&body) {
            Ok(value) => Ok(Self(value)),
            Err(e) => {
                debug!(error = %e, "unusable JSON body, using defaults");
                Ok(Self(T::default()))
            }
        }
    }
}

/// Interpret an `ids` field. A JSON array yields the ids it contains
/// (numbers or numeric strings with an integral value, so `1.0` and `"1"`
/// both name product 1; anything else is skipped). Any other value,
/// including an absent field, means "no filter".
pub fn id_filter(ids: &Value) -> Option<Vec<ProductId>> {
    let Value::Array(items) = ids else {
        return None;
    };
    Some(
        items
            .iter()
            .filter_map(|item| match item {
                Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(integral_id)),
                Value::String(s) => s.trim().parse().ok().and_then(integral_id),
                _ => None,
            })
            .collect(),
    )
}

fn integral_id(n: f64) -> Option<ProductId> {
    (n.is_finite() && n.fract() == 0.0 && n >= 1.0 && n < ProductId::MAX as f64)
        .then_some(n as ProductId)
}
