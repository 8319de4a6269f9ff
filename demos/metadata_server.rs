//! REST API server example
//!
//! Runs the metadata export service with the default configuration, or with a
//! JSON config file passed as the first argument.
//!
//! After starting, you can:
//! - View Swagger UI at http://localhost:8501/swagger-ui
//! - Download a workbook via POST http://localhost:8501/metadata/export
//! - Preview rows as JSON via POST http://localhost:8501/metadata/preview

use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use uid_metadata::api::start_api_server;
use uid_metadata::{Config, HttpMetadataClient, MetadataTabulator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("uid_metadata=debug,tower_http=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    let client = HttpMetadataClient::new(&config.metadata)?;
    let tabulator = Arc::new(MetadataTabulator::new(Arc::new(client)));
    let address = config.server.api.bind_address;

    println!("Starting uid-metadata REST API server");
    println!("Swagger UI: http://{address}/swagger-ui");
    println!();
    println!("Example commands:");
    println!("  # Download the workbook");
    println!("  curl -F file=@uids.csv -OJ http://{address}/metadata/export");
    println!();
    println!("  # Preview the rows as JSON");
    println!("  curl -F file=@uids.csv http://{address}/metadata/preview");

    // Runs until Ctrl+C / SIGTERM
    start_api_server(tabulator, Arc::new(config)).await?;

    Ok(())
}
