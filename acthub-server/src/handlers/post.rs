//! Plain chatter post action (service-account grant, no browser dance)

use super::{authenticate, service_account_token};
use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};
use acthub_core::{ActionRequest, FormField, ValidationErrors};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

pub async fn form(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    authenticate(&state, &headers)?;
    let fields = vec![FormField::textarea("content", "Content")
        .with_description("Share an update")
        .required()];
    Ok(Json(fields).into_response())
}

pub async fn execute(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Response> {
    authenticate(&state, &headers)?;

    let mut errors = ValidationErrors::new();
    let Some(content) = request.require("content", &mut errors) else {
        return Err(ApiError::from(errors));
    };

    let token = service_account_token(&state).await?;
    let element = json!({
        "body": {
            "messageSegments": [
                {"type": "Text", "text": content}
            ]
        },
        "feedElementType": "FeedItem",
        "subjectId": request.cell_value(),
    });
    state.crm.post_feed_element(&token, element).await?;

    Ok((StatusCode::OK, Json(json!({}))).into_response())
}
