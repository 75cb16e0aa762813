//! HTTP API server for the product catalog.
//!
//! The binary in `main.rs` wires configuration, logging and middleware
//! around [`router`]; tests drive the router in-process.

pub mod server;

pub use server::{
    ApiError, AppState, Config, CorsConfig, LoggingConfig, ServerConfig, StoreConfig,
    build_cors_layer, init_logging, router,
};
