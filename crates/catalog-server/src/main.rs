//! Product catalog HTTP API server.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{Router, routing::get};
use clap::Parser;
use tokio::signal;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use catalog_server::server::{docs_page, not_found};
use catalog_server::{AppState, Config, build_cors_layer, init_logging, router};

/// Product catalog HTTP API server.
#[derive(Parser, Debug)]
#[command(name = "catalog-server")]
#[command(about = "HTTP API server for the product catalog")]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long, env = "CATALOG_CONFIG", default_value = "catalog-server.toml")]
    config: PathBuf,

    /// Port to listen on, overriding the configuration file.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration first (needed for logging setup)
    let mut config = Config::from_file(&args.config)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    let bind_addr = config.bind_addr();

    init_logging(&config.logging)?;

    tracing::info!("Opening catalog at {}", config.store.path);
    let state = AppState::from_config(&config)?;

    let mut app = router(state);

    if let Some(static_path) = &config.server.static_path {
        tracing::info!("Serving admin UI from: {}", static_path);
        app = app.fallback_service(ServeDir::new(static_path));
    } else {
        // Without an admin UI the root shows the API docs.
        app = app.route("/", get(docs_page)).fallback(not_found);
    }

    let cors = build_cors_layer(&config.cors);
    if config.cors.enabled {
        tracing::info!(
            "CORS enabled with {} allowed origin(s)",
            config.cors.allow_origins.len()
        );
    } else {
        tracing::info!("CORS disabled (denying cross-origin requests)");
    }

    let app: Router = app.layer(cors).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = bind_addr.parse()?;
    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
