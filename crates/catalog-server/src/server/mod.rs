//! HTTP API server for the product catalog.
//!
//! This module exposes the catalog library over JSON HTTP endpoints using
//! axum, with bearer-token authentication on mutating routes, optional
//! static serving of the admin UI, and configurable CORS.

mod auth;
mod body;
mod config;
mod cors;
mod error;
mod logging;
mod routes;
mod state;

pub use auth::{CurrentUser, require_auth};
pub use config::{
    Config, ConfigError, CorsConfig, LogFormat, LoggingConfig, ServerConfig, StoreConfig,
};
pub use cors::build_cors_layer;
pub use error::ApiError;
pub use logging::{LoggingError, init as init_logging};
pub use routes::{docs_page, not_found, router};
pub use state::{AppState, StateError};
