//! Reading the identifier list out of an uploaded CSV

use crate::error::{Error, Result};
use crate::types::UserId;
use csv::{ReaderBuilder, Trim};
use std::collections::HashSet;
use tracing::debug;

/// Parse `data` as CSV with a header row and collect the unique, non-blank
/// values of `column`, in first-seen order.
///
/// The header lookup is case-sensitive. A missing column is reported before
/// anything else happens, so callers can rely on it to abort a run before any
/// network traffic.
///
/// # Errors
///
/// - [`Error::MissingColumn`] if no header equals `column`
/// - [`Error::Csv`] if the data is not valid CSV
///
/// # Example
///
/// ```
/// use uid_metadata::input::read_identifiers;
///
/// let ids = read_identifiers(b"UID,name\n7,a\n9,b\n7,c\n", "UID").unwrap();
/// let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
/// assert_eq!(ids, ["7", "9"]);
/// ```
pub fn read_identifiers(data: &[u8], column: &str) -> Result<Vec<UserId>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let index = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| Error::MissingColumn {
            column: column.to_string(),
            available: headers
                .iter()
                .map(|h| h.trim_start_matches('\u{feff}').to_string())
                .collect(),
        })?;

    let mut seen = HashSet::new();
    let mut identifiers = Vec::new();
    let mut duplicates = 0usize;
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        match record.get(index) {
            Some(value) if !value.is_empty() => {
                if seen.insert(value.to_string()) {
                    identifiers.push(UserId::new(value));
                } else {
                    duplicates += 1;
                }
            }
            _ => skipped += 1,
        }
    }

    debug!(
        column,
        unique = identifiers.len(),
        duplicates,
        skipped,
        "Read identifiers from upload"
    );

    Ok(identifiers)
}
