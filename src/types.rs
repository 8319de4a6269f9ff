//! Core types for uid-metadata

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Placeholder written for any metadata field the service did not return
pub const NOT_AVAILABLE: &str = "N/A";

/// Header row of the generated workbook, in column order
pub const COLUMN_HEADERS: [&str; 10] = [
    "User ID",
    "Display Name",
    "First Name",
    "Last Name",
    "Email",
    "Gender",
    "DOB",
    "College",
    "Status",
    "Error",
];

/// Opaque user identifier, passed verbatim to the metadata endpoint
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Create a new UserId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What happened when the metadata for one identifier was requested
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// HTTP 200 with a JSON body
    Success,
    /// The service answered with anything other than 200
    HttpFailure {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },
    /// No usable response: connect error, timeout, unreadable body
    TransportFailure {
        /// Description of the underlying error
        message: String,
    },
}

impl FetchOutcome {
    /// Whether the row holds real metadata
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success)
    }

    /// Text for the Status column
    pub fn status_label(&self) -> String {
        match self {
            FetchOutcome::Success => "Success".to_string(),
            FetchOutcome::HttpFailure { status, .. } => format!("Failed: {status}"),
            FetchOutcome::TransportFailure { .. } => "Error".to_string(),
        }
    }

    /// Text for the Error column
    pub fn error_detail(&self) -> &str {
        match self {
            FetchOutcome::Success => "",
            FetchOutcome::HttpFailure { body, .. } => body,
            FetchOutcome::TransportFailure { message } => message,
        }
    }
}

/// One flattened row of output, one per requested identifier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MetadataRecord {
    /// The identifier this row belongs to
    pub user_id: UserId,
    /// `metadata.displayName`
    pub display_name: String,
    /// `metadata.first_name`
    pub first_name: String,
    /// `metadata.last_name`
    pub last_name: String,
    /// `metadata.dh.newsLetter.email`
    pub email: String,
    /// `metadata.gender`
    pub gender: String,
    /// `metadata.dob` as `day-month-year`
    pub dob: String,
    /// `metadata.college`
    pub college: String,
    /// Outcome of the request
    pub outcome: FetchOutcome,
}

impl MetadataRecord {
    /// Row for a non-200 response: only the identifier and the failure are kept.
    pub fn http_failure(user_id: &UserId, status: u16, body: impl Into<String>) -> Self {
        Self::failed(
            user_id,
            FetchOutcome::HttpFailure {
                status,
                body: body.into(),
            },
        )
    }

    /// Row for a request that produced no usable response.
    pub fn transport_failure(user_id: &UserId, message: impl Into<String>) -> Self {
        Self::failed(
            user_id,
            FetchOutcome::TransportFailure {
                message: message.into(),
            },
        )
    }

    fn failed(user_id: &UserId, outcome: FetchOutcome) -> Self {
        Self {
            user_id: user_id.clone(),
            display_name: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            gender: String::new(),
            dob: String::new(),
            college: String::new(),
            outcome,
        }
    }

    /// Cell values in [`COLUMN_HEADERS`] order
    pub fn cells(&self) -> [String; COLUMN_HEADERS.len()] {
        [
            self.user_id.0.clone(),
            self.display_name.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.gender.clone(),
            self.dob.clone(),
            self.college.clone(),
            self.outcome.status_label(),
            self.outcome.error_detail().to_string(),
        ]
    }
}

/// Records in input order, one per identifier
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    /// The rows
    pub records: Vec<MetadataRecord>,
}

impl ResultTable {
    /// Create an empty table with room for `capacity` rows
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows whose fetch did not succeed
    pub fn failed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.outcome.is_success())
            .count()
    }

    /// Iterate over rows in order
    pub fn iter(&self) -> std::slice::Iter<'_, MetadataRecord> {
        self.records.iter()
    }
}

/// Progress of a tabulation run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Identifiers processed so far
    pub completed: usize,
    /// Identifiers in the run
    pub total: usize,
}

impl Progress {
    /// Completed share in `[0.0, 1.0]`. An empty run counts as finished.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed.min(self.total) as f64) / (self.total as f64)
    }
}

/// A serialized workbook ready to hand to the user
#[derive(Clone, Debug)]
pub struct SpreadsheetArtifact {
    /// The `.xlsx` bytes
    pub bytes: Vec<u8>,
    /// Suggested download filename
    pub filename: String,
}

impl SpreadsheetArtifact {
    /// MIME type of every artifact
    pub const CONTENT_TYPE: &'static str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
}
