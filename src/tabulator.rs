//! The fetch-and-tabulate pipeline

use crate::config::OutputConfig;
use crate::error::Result;
use crate::metadata::MetadataSource;
use crate::spreadsheet;
use crate::types::{MetadataRecord, Progress, ResultTable, SpreadsheetArtifact, UserId};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Turns a list of identifiers into a [`ResultTable`] and a workbook
///
/// Holds no per-run state: everything a run needs is passed in, and
/// everything it produces is returned.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use uid_metadata::{Config, HttpMetadataClient, MetadataTabulator, UserId};
///
/// # async fn example() -> uid_metadata::Result<()> {
/// let config = Config::default();
/// let client = HttpMetadataClient::new(&config.metadata)?;
/// let tabulator = MetadataTabulator::new(Arc::new(client));
///
/// let ids = vec![UserId::from("1001"), UserId::from("1002")];
/// let (table, artifact) = tabulator
///     .export(&ids, &config.output, |p| println!("{:.0}%", p.fraction() * 100.0))
///     .await?;
/// assert_eq!(table.len(), 2);
/// std::fs::write(&artifact.filename, &artifact.bytes)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MetadataTabulator {
    source: Arc<dyn MetadataSource>,
}

impl MetadataTabulator {
    /// Create a tabulator backed by `source`
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        Self { source }
    }

    /// Fetch a single identifier
    pub async fn fetch_one(&self, user_id: &UserId) -> MetadataRecord {
        self.source.fetch(user_id).await
    }

    /// Fetch every identifier, one after another, in order.
    ///
    /// Row `i` of the result always belongs to `identifiers[i]`. Failed
    /// lookups are recorded in their row and the run carries on.
    /// `on_progress` is called once after each identifier.
    pub async fn tabulate<F>(&self, identifiers: &[UserId], mut on_progress: F) -> ResultTable
    where
        F: FnMut(Progress) + Send,
    {
        let total = identifiers.len();
        let started = Instant::now();
        let mut table = ResultTable::with_capacity(total);

        info!(total, "Starting metadata run");

        for (index, user_id) in identifiers.iter().enumerate() {
            let record = self.fetch_one(user_id).await;
            debug!(
                user_id = %user_id,
                status = %record.outcome.status_label(),
                completed = index + 1,
                total,
                "Processed identifier"
            );
            table.records.push(record);
            on_progress(Progress {
                completed: index + 1,
                total,
            });
        }

        info!(
            total,
            failed = table.failed_count(),
            elapsed = ?started.elapsed(),
            "Metadata run finished"
        );

        table
    }

    /// [`tabulate`](Self::tabulate) then [`spreadsheet::serialize`]
    pub async fn export<F>(
        &self,
        identifiers: &[UserId],
        output: &OutputConfig,
        on_progress: F,
    ) -> Result<(ResultTable, SpreadsheetArtifact)>
    where
        F: FnMut(Progress) + Send,
    {
        let table = self.tabulate(identifiers, on_progress).await;
        let artifact = spreadsheet::serialize(&table, output)?;
        Ok((table, artifact))
    }
}

impl std::fmt::Debug for MetadataTabulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataTabulator").finish_non_exhaustive()
    }
}
