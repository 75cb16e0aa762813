//! CORS layer construction.

use std::time::Duration;

use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use super::config::CorsConfig;

/// Build CORS layer from configuration.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    if !config.enabled {
        // Deny all cross-origin requests by default
        return CorsLayer::new();
    }

    let mut cors = CorsLayer::new();
    let any_origin = config.allow_origins.iter().any(|o| o == "*");

    if any_origin {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .allow_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<_> = config
        .allow_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    let headers: Vec<_> = config
        .allow_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();
    cors = cors.allow_headers(headers);

    // Credentials cannot be combined with a wildcard origin.
    if config.allow_credentials {
        if any_origin {
            warn!("CORS allow_credentials ignored because allow_origins contains \"*\"");
        } else {
            cors = cors.allow_credentials(true);
        }
    }

    cors.max_age(Duration::from_secs(config.max_age))
}
