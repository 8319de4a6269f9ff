//! # uid-metadata
//!
//! Fetch user profile metadata for a CSV of user IDs and tabulate it into an
//! `.xlsx` workbook.
//!
//! The pipeline has three steps:
//! 1. [`input::read_identifiers`] pulls the unique IDs out of the upload's `UID` column
//! 2. [`MetadataTabulator::tabulate`] asks the metadata service about each ID,
//!    one request at a time, recording failures inline
//! 3. [`spreadsheet::serialize`] writes the rows under a fixed header
//!
//! The [`api`] module wraps this in an upload/download REST endpoint.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use uid_metadata::{Config, HttpMetadataClient, MetadataTabulator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = HttpMetadataClient::new(&config.metadata)?;
//!     let tabulator = Arc::new(MetadataTabulator::new(Arc::new(client)));
//!
//!     uid_metadata::api::start_api_server(tabulator, Arc::new(config)).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Identifier input
pub mod input;
/// Metadata sources
pub mod metadata;
/// Workbook output
pub mod spreadsheet;
/// The fetch-and-tabulate pipeline
pub mod tabulator;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{ApiError, Error, ErrorDetail, Result, ToHttpStatus};
pub use metadata::{HttpMetadataClient, MetadataSource};
pub use tabulator::MetadataTabulator;
pub use types::{
    FetchOutcome, MetadataRecord, Progress, ResultTable, SpreadsheetArtifact, UserId,
};

/// Resolves when the process receives a termination signal.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            sigint.recv().await;
            tracing::info!("Received SIGINT signal (Ctrl+C)");
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            sigterm.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        (Err(e), Err(_)) => {
            tracing::error!(error = %e, "Could not register any signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

/// Resolves when the process receives Ctrl+C.
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
