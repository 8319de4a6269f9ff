//! HTTP error response handling for the API

use crate::error::{ApiError, Error, ToHttpStatus};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let api_error: ApiError = self.into();
        (status_code, Json(api_error)).into_response()
    }
}

/// A bare `ApiError` has no status of its own, so it is served as 500
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    async fn decode(response: Response) -> ApiError {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn missing_column_is_422_with_details() {
        let response = Error::MissingColumn {
            column: "UID".into(),
            available: vec!["id".into()],
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let api_error = decode(response).await;
        assert_eq!(api_error.error.code, "missing_column");
        assert_eq!(api_error.error.details.unwrap()["available"][0], "id");
    }

    #[tokio::test]
    async fn invalid_upload_is_400() {
        let response = Error::InvalidUpload("no 'file' field".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(decode(response).await.error.code, "invalid_upload");
    }

    #[tokio::test]
    async fn bare_api_error_is_500() {
        let response = ApiError::new("internal_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(decode(response).await.error.message, "boom");
    }
}
