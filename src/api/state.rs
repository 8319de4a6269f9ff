//! Application state for the API server

use crate::{Config, MetadataTabulator};
use std::sync::Arc;

/// Shared state handed to every route handler (cheap `Arc` clones)
#[derive(Clone)]
pub struct AppState {
    /// Runs the fetch-and-tabulate pipeline
    pub tabulator: Arc<MetadataTabulator>,

    /// Configuration (input column, output layout)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(tabulator: Arc<MetadataTabulator>, config: Arc<Config>) -> Self {
        Self { tabulator, config }
    }
}
