//! Chatter poll action (service-account grant)

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
    let fields = vec![
        FormField::textarea("question", "Question")
            .with_description("What would you like to add?")
            .required(),
        FormField::text("choice_1", "Choice 1").required(),
        FormField::text("choice_2", "Choice 2").required(),
    ];
    Ok(Json(fields).into_response())
}

pub async fn execute(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Response> {
    authenticate(&state, &headers)?;

    let mut errors = ValidationErrors::new();
    let question = request.require("question", &mut errors);
    let choice_1 = request.require("choice_1", &mut errors);
    let choice_2 = request.require("choice_2", &mut errors);
    let (Some(question), Some(choice_1), Some(choice_2)) = (question, choice_1, choice_2) else {
        return Err(ApiError::from(errors));
    };

    let token = service_account_token(&state).await?;
    let element = json!({
        "body": {
            "messageSegments": [
                {"type": "Text", "text": question}
            ]
        },
        "capabilities": {
            "poll": {
                "choices": [choice_1, choice_2]
            }
        },
        "feedElementType": "FeedItem",
        "subjectId": request.cell_value(),
    });
    state.crm.post_feed_element(&token, element).await?;

    Ok((StatusCode::OK, Json(json!({}))).into_response())
}
