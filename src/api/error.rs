use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::catalog::CatalogError;

/// Handler result type. The error half renders as a JSON body.
pub type ApiResult<T> = Result<T, ApiError>;

/// Wraps [`CatalogError`] so handlers can use `?` and still produce
/// the wire format: `{"error": "<message>"}` with a matching status.
#[derive(Debug)]
pub struct ApiError(CatalogError);

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            CatalogError::TitleRequired
            | CatalogError::ItemTypeRequired
            | CatalogError::InvalidDate(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            // Fixed body, the id is not echoed back.
            CatalogError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found".to_string()),
            CatalogError::Store(err) => {
                error!("Catalog store failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
