// src/bin/api_server.rs

use stray_animal_registry::infra::{logging, AppConfig};
use stray_animal_registry::transport;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    logging::init();

    // --- Service Initialization ---
    info!(
        data_file = %config.data_file.display(),
        upload_dir = %config.upload_dir.display(),
        max_upload_bytes = config.max_upload_bytes,
        "Initializing animal report service"
    );
    let app_state = transport::http::AppState::from_config(&config)?;
    let schema = app_state.report_service.schema();
    info!(
        schema = %schema.name,
        types = ?schema.types,
        statuses = ?schema.statuses,
        "Report schema loaded"
    );
    // Fail fast on an unreadable record document instead of on the first request.
    let existing = app_state.report_service.count().await?;
    info!(
        records = existing,
        store = %app_state.report_service.store_description(),
        "Record store ready"
    );

    // --- API Server Initialization ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "API server listening");
    info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Graceful shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    info!("Shutdown signal received, draining in-flight requests");
}
