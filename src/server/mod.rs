use crate::config::Config;
use crate::library::Library;
use crate::pipeline::PipelineRunner;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod error;
pub mod routes_library;
pub mod routes_process;
pub mod routes_stream;

/// Shared application context
///
/// Cheaply cloneable: only `Arc`s. Nothing here is mutable after startup;
/// requests share no state beyond the configuration and the library root.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub library: Arc<Library>,
    pub pipeline: Arc<PipelineRunner>,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        let library = Library::new(
            config.library.root.clone(),
            config.server.effective_base_url(),
        );
        let pipeline = PipelineRunner::from_config(&config.pipeline);
        Self {
            config: Arc::new(config),
            library: Arc::new(library),
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let static_dir = ctx.config.server.static_dir.clone();

    // The stream endpoint is consumed cross-origin by the review UI; the
    // Range header must survive preflight.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::RANGE]);

    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/videos", get(routes_library::list_videos))
        .route("/check", get(routes_library::check_path))
        .route("/process", post(routes_process::process_videos))
        .route(
            "/stream/{*path}",
            get(routes_stream::stream_file).options(routes_stream::stream_preflight),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Serve static files if directory is provided
    // Uses SPA fallback: serves index.html for any route that doesn't match a file
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        }
    }

    app
}

async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    tracing::info!("Library root: {:?}", config.library.root);

    let ctx = AppContext::new(config);
    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
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
