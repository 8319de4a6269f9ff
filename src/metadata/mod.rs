//! Fetching user metadata
//!
//! [`MetadataSource`] is the seam between the tabulator and whatever answers
//! "what do we know about this user". [`HttpMetadataClient`] is the production
//! implementation; tests plug in their own.

use crate::types::{MetadataRecord, UserId};
use async_trait::async_trait;

mod client;
pub mod extract;

pub use client::HttpMetadataClient;

/// Source of per-user metadata
///
/// `fetch` never fails: HTTP and transport problems are encoded in the
/// returned record's [`FetchOutcome`](crate::types::FetchOutcome), so one bad
/// identifier can't stop a run.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use uid_metadata::metadata::MetadataSource;
/// use uid_metadata::types::{MetadataRecord, UserId};
///
/// struct Offline;
///
/// #[async_trait]
/// impl MetadataSource for Offline {
///     async fn fetch(&self, user_id: &UserId) -> MetadataRecord {
///         MetadataRecord::transport_failure(user_id, "offline")
///     }
/// }
/// ```
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Look up one identifier. Exactly one upstream request per call.
    async fn fetch(&self, user_id: &UserId) -> MetadataRecord;
}
