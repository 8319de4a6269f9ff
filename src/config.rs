//! Configuration types for uid-metadata

use crate::error::{Error, Result};
use crate::spreadsheet::MAX_CELL_CHARS;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, time::Duration};
use utoipa::ToSchema;

/// Main configuration
///
/// Fields are organized into sub-configs:
/// - [`metadata`](MetadataConfig) - the remote metadata endpoint
/// - [`input`](InputConfig) - how identifiers are read from the upload
/// - [`output`](OutputConfig) - how the workbook is laid out and named
/// - [`server`](ServerIntegrationConfig) - the REST API
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Remote metadata endpoint settings
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// Identifier input settings
    #[serde(default)]
    pub input: InputConfig,

    /// Workbook output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// API and external server integration
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file '{}': {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings that would otherwise only fail halfway through a run.
    pub fn validate(&self) -> Result<()> {
        if self.metadata.base_url.trim().is_empty() {
            return Err(Error::config("metadata.base_url", "base URL must not be empty"));
        }
        if self.metadata.user_id_param.is_empty() {
            return Err(Error::config(
                "metadata.user_id_param",
                "query parameter name must not be empty",
            ));
        }
        if self.metadata.timeout.is_zero() {
            return Err(Error::config("metadata.timeout", "timeout must be at least 1 second"));
        }
        if self.metadata.max_error_body_chars > MAX_CELL_CHARS {
            return Err(Error::config(
                "metadata.max_error_body_chars",
                format!("error body limit must not exceed {MAX_CELL_CHARS} characters (one Excel cell)"),
            ));
        }
        if self.input.id_column.is_empty() {
            return Err(Error::config("input.id_column", "identifier column must not be empty"));
        }
        validate_sheet_name(&self.output.sheet_name)?;
        if self.server.api.max_upload_bytes == 0 {
            return Err(Error::config(
                "server.api.max_upload_bytes",
                "upload limit must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Excel's own worksheet name rules.
fn validate_sheet_name(name: &str) -> Result<()> {
    const FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

    if name.is_empty() || name.chars().count() > 31 {
        return Err(Error::config(
            "output.sheet_name",
            "sheet name must be 1-31 characters",
        ));
    }
    if name.contains(FORBIDDEN) || name.starts_with('\'') || name.ends_with('\'') {
        return Err(Error::config(
            "output.sheet_name",
            format!("sheet name '{name}' contains characters Excel does not allow"),
        ));
    }
    Ok(())
}

/// Remote metadata endpoint configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MetadataConfig {
    /// Endpoint queried once per identifier
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Query parameter carrying the identifier (default: "userId")
    #[serde(default = "default_user_id_param")]
    pub user_id_param: String,

    /// Per-request timeout (default: 10 seconds)
    #[serde(default = "default_timeout", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub timeout: Duration,

    /// Optional bearer token sent as `Authorization: Bearer <token>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,

    /// User agent for outbound requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// How much of a non-200 response body is kept in the Error column (default: 500, at most one Excel cell)
    #[serde(default = "default_max_error_body_chars")]
    pub max_error_body_chars: usize,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id_param: default_user_id_param(),
            timeout: default_timeout(),
            bearer_token: None,
            user_agent: default_user_agent(),
            max_error_body_chars: default_max_error_body_chars(),
        }
    }
}

/// Identifier input configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct InputConfig {
    /// Case-sensitive name of the identifier column (default: "UID")
    #[serde(default = "default_id_column")]
    pub id_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            id_column: default_id_column(),
        }
    }
}

/// Workbook output configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct OutputConfig {
    /// Worksheet name (default: "User Metadata")
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Filename prefix; the timestamp and `.xlsx` are appended (default: "user_metadata")
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sheet_name: default_sheet_name(),
            filename_prefix: default_filename_prefix(),
        }
    }
}

/// API and external server integration configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:8501)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Optional API key for authentication
    #[serde(default)]
    pub api_key: Option<String>,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,

    /// Largest accepted upload body in bytes (default: 10 MiB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            api_key: None,
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_base_url() -> String {
    "https://sso.tpml.in/auth/get-user-metadata".into()
}

fn default_user_id_param() -> String {
    "userId".into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    concat!("uid-metadata/", env!("CARGO_PKG_VERSION")).into()
}

fn default_max_error_body_chars() -> usize {
    500
}

fn default_id_column() -> String {
    "UID".into()
}

fn default_sheet_name() -> String {
    "User Metadata".into()
}

fn default_filename_prefix() -> String {
    "user_metadata".into()
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8501))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
