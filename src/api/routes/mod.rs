//! Route handlers for the REST API
//!
//! - `metadata`: CSV upload, workbook download, JSON preview
//! - `system`: health and OpenAPI

use crate::types::MetadataRecord;
use serde::{Deserialize, Serialize};

mod metadata;
mod system;

pub use metadata::*;
pub use system::*;

/// Response for POST /metadata/preview
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct MetadataPreview {
    /// Number of rows (one per unique identifier)
    pub total: usize,
    /// Rows whose lookup failed
    pub failed: usize,
    /// The rows, in upload order
    pub records: Vec<MetadataRecord>,
}
