pub mod error;
pub mod handlers;

use crate::core::StockService;
use crate::utils::error::Result;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: StockService,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(service: StockService, http: reqwest::Client) -> Self {
        Self { service, http }
    }
}

pub fn router(state: AppState) -> Router {
    let proxy_path = state.service.config().proxy_path().to_string();

    Router::new()
        .route("/healthz", get(handlers::health))
        .route("/api/stock/aktif", get(handlers::active_stock))
        .route("/api/stock/active-summary", get(handlers::active_summary))
        .route("/api/stock/restock-time", get(handlers::restock_time))
        .route(&proxy_path, get(handlers::image_proxy))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl-C or SIGTERM.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, state, shutdown_signal()).await
}

pub async fn serve_on<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    // Log the route table
    tracing::info!("Registering routes:");
    tracing::info!("  GET /api/stock/aktif");
    tracing::info!("  GET /api/stock/active-summary");
    tracing::info!("  GET /api/stock/restock-time");
    tracing::info!("  GET {}?url=", state.service.config().proxy_path());
    tracing::info!("  GET /healthz");

    // Serve until the shutdown future resolves, then drain in-flight requests
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("Shutdown signal received, draining connections");
}
