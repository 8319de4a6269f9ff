//! Upload → tabulate → download handlers.

use super::MetadataPreview;
use crate::api::AppState;
use crate::error::{Error, Result};
use crate::input::read_identifiers;
use crate::types::{Progress, SpreadsheetArtifact, UserId};
use axum::{
    Json,
    body::Body,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::Response,
};
use tracing::{debug, info};

/// Response header carrying the number of rows in the workbook
pub const ROWS_TOTAL_HEADER: &str = "x-rows-total";
/// Response header carrying the number of failed rows in the workbook
pub const ROWS_FAILED_HEADER: &str = "x-rows-failed";

/// POST /metadata/export - Upload a CSV of user IDs, download the metadata workbook
#[utoipa::path(
    post,
    path = "/metadata/export",
    tag = "metadata",
    request_body(content = Vec<u8>, description = "CSV upload in the 'file' field (multipart/form-data)", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "xlsx workbook, one row per unique identifier", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "No file in the upload", body = crate::error::ApiError),
        (status = 422, description = "Identifier column missing or CSV malformed", body = crate::error::ApiError),
        (status = 500, description = "Workbook could not be generated", body = crate::error::ApiError)
    )
)]
pub async fn export_metadata(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let identifiers = identifiers_from_upload(&state, multipart).await?;

    let (table, artifact) = state
        .tabulator
        .export(&identifiers, &state.config.output, log_progress)
        .await?;

    info!(
        rows = table.len(),
        failed = table.failed_count(),
        filename = %artifact.filename,
        "Serving metadata workbook"
    );

    let SpreadsheetArtifact { bytes, filename } = artifact;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, SpreadsheetArtifact::CONTENT_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .header(ROWS_TOTAL_HEADER, table.len())
        .header(ROWS_FAILED_HEADER, table.failed_count())
        .body(Body::from(bytes))
        .map_err(|e| Error::Other(format!("Failed to build response: {e}")))
}

/// POST /metadata/preview - Upload a CSV of user IDs, get the rows back as JSON
#[utoipa::path(
    post,
    path = "/metadata/preview",
    tag = "metadata",
    request_body(content = Vec<u8>, description = "CSV upload in the 'file' field (multipart/form-data)", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Tabulated rows", body = MetadataPreview),
        (status = 400, description = "No file in the upload", body = crate::error::ApiError),
        (status = 422, description = "Identifier column missing or CSV malformed", body = crate::error::ApiError)
    )
)]
pub async fn preview_metadata(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MetadataPreview>> {
    let identifiers = identifiers_from_upload(&state, multipart).await?;
    let table = state.tabulator.tabulate(&identifiers, log_progress).await;

    Ok(Json(MetadataPreview {
        total: table.len(),
        failed: table.failed_count(),
        records: table.records,
    }))
}

/// Pull the `file` field out of the upload and read its identifier column.
///
/// Any problem here is reported before a single metadata request is made.
async fn identifiers_from_upload(state: &AppState, mut multipart: Multipart) -> Result<Vec<UserId>> {
    let mut csv_content: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidUpload(format!("Failed to read multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidUpload(format!("Failed to read file: {e}")))?;
        debug!(filename = ?filename, size = bytes.len(), "Received upload");
        csv_content = Some(bytes.to_vec());
    }

    let csv_content = csv_content
        .ok_or_else(|| Error::InvalidUpload("No CSV file provided in 'file' field".to_string()))?;

    read_identifiers(&csv_content, &state.config.input.id_column)
}

fn log_progress(progress: Progress) {
    debug!(
        completed = progress.completed,
        total = progress.total,
        fraction = progress.fraction(),
        "Metadata progress"
    );
}
