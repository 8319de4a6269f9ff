//! REST API server module
//!
//! Exposes the upload → tabulate → download flow over HTTP.

use crate::{Config, MetadataTabulator, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router
///
/// # Routes
///
/// - `POST /metadata/export` - Upload a CSV (`file` field), download the xlsx workbook
/// - `POST /metadata/preview` - Upload a CSV (`file` field), get the rows as JSON
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_router(tabulator: Arc<MetadataTabulator>, config: Arc<Config>) -> Router {
    let api = &config.server.api;
    let state = AppState::new(tabulator, config.clone());

    let router = Router::new()
        .route("/metadata/export", post(routes::export_metadata))
        .route("/metadata/preview", post(routes::preview_metadata))
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    let router = if api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    let router = router
        .with_state(state)
        .layer(DefaultBodyLimit::max(api.max_upload_bytes));

    // The last layer applied is the outermost: Trace → CORS → Auth → Handler
    let router = if api.api_key.is_some() {
        router.layer(middleware::from_fn_with_state(
            api.api_key.clone(),
            auth::require_api_key,
        ))
    } else {
        router
    };

    let router = if api.cors_enabled {
        router.layer(build_cors_layer(&api.cors_origins))
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

/// Build a CORS layer based on configured origins ("*" allows any origin)
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    let layer = if allow_any || origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new().allow_origin(AllowOrigin::list(allowed))
    };

    layer
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            axum::http::header::CONTENT_DISPOSITION,
            axum::http::HeaderName::from_static(routes::ROWS_TOTAL_HEADER),
            axum::http::HeaderName::from_static(routes::ROWS_FAILED_HEADER),
        ])
}

/// Start the API server on the configured bind address.
///
/// Runs until SIGINT/SIGTERM, then finishes in-flight requests and returns.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use uid_metadata::{Config, HttpMetadataClient, MetadataTabulator};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let client = HttpMetadataClient::new(&config.metadata)?;
/// let tabulator = Arc::new(MetadataTabulator::new(Arc::new(client)));
///
/// uid_metadata::api::start_api_server(tabulator, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(tabulator: Arc<MetadataTabulator>, config: Arc<Config>) -> Result<()> {
    let listener = TcpListener::bind(config.server.api.bind_address)
        .await
        .map_err(crate::error::Error::Io)?;
    serve(listener, tabulator, config, crate::shutdown_signal()).await
}

/// Serve the API on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    tabulator: Arc<MetadataTabulator>,
    config: Arc<Config>,
    shutdown: F,
) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr().map_err(crate::error::Error::Io)?;
    let app = create_router(tabulator, config);

    tracing::info!(address = %address, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
