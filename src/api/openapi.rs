//! OpenAPI documentation and schema generation

use utoipa::OpenApi;

/// OpenAPI documentation for the uid-metadata REST API
///
/// Served at `/openapi.json`, and through Swagger UI at `/swagger-ui` when enabled.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "uid-metadata REST API",
        version = "0.1.0",
        description = "Upload a CSV of user IDs, get back a spreadsheet of their profile metadata",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8501", description = "Local development server")
    ),
    paths(
        crate::api::routes::export_metadata,
        crate::api::routes::preview_metadata,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::types::UserId,
        crate::types::FetchOutcome,
        crate::types::MetadataRecord,

        crate::config::Config,
        crate::config::MetadataConfig,
        crate::config::InputConfig,
        crate::config::OutputConfig,
        crate::config::ServerIntegrationConfig,
        crate::config::ApiConfig,

        crate::api::routes::MetadataPreview,

        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "metadata", description = "User metadata export"),
        (name = "system", description = "Health and documentation")
    )
)]
pub struct ApiDoc;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = spec["paths"].as_object().unwrap();
        for route in ["/metadata/export", "/metadata/preview", "/health", "/openapi.json"] {
            assert!(paths.contains_key(route), "missing {route}");
        }
        let schemas = spec["components"]["schemas"].as_object().unwrap();
        assert!(schemas.contains_key("MetadataRecord"));
        assert!(schemas.contains_key("MetadataPreview"));
        for internal in ["ResultTable", "Progress"] {
            assert!(!schemas.contains_key(internal), "{internal} is not served by any route");
        }
    }
}
