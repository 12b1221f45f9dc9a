//! HTTP mapping for the shared error taxonomy

use acthub_core::HubError;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};

pub type ApiResult<T> = Result<T, ApiError>;

/// Newtype carrying [`HubError`] across the axum boundary.
#[derive(Debug)]
pub struct ApiError(pub HubError);

impl<E> From<E> for ApiError
where
    E: Into<HubError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            HubError::Authentication { status, message } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::UNAUTHORIZED);
                (status, Json(serde_json::json!({"success": false, "error": message})))
                    .into_response()
            }
            HubError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"success": false, "validation_errors": errors})),
            )
                .into_response(),
            HubError::Token => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "success": false,
                    "error": "invalid or missing state token"
                })),
            )
                .into_response(),
            HubError::Upstream { status, body } => {
                // Verbatim pass-through; only the hub client can decide
                // how to present the CRM's verdict.
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
            }
            HubError::Network(message) => {
                tracing::warn!(target: "api_error", "upstream request failed: {}", message);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(serde_json::json!({"success": false, "error": message})),
                )
                    .into_response()
            }
            HubError::Internal(err) => {
                tracing::error!(target: "api_error", "internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"success": false, "error": "internal error"})),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acthub_core::ValidationErrors;

    #[test]
    fn test_validation_maps_to_400_with_flat_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("due_date", "Missing required parameter");
        let response = ApiError(HubError::Validation(errors)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_keeps_status() {
        let response = ApiError(HubError::Upstream { status: 418, body: "{}".into() }).into_response();
        assert_eq!(response.status().as_u16(), 418);
    }

    #[test]
    fn test_network_is_bad_gateway() {
        let response = ApiError(HubError::Network("timed out".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
