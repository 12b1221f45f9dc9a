//! OAuth-gated campaign creation action
//!
//! form → login link (no session yet) or field list (session resumed);
//! oauth → code exchange + session write + redirect; execute → composite
//! record creation with the session token.

use super::{authenticate, require_session_token};
use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};
use acthub_authflow::{GrantRequest, StatePayload};
use acthub_core::{ActionRequest, FormField, HubError, ValidationErrors};
use acthub_core::validation::require_date;
use anyhow::anyhow;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::Deserialize;
use serde_json::json;

pub async fn form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Response> {
    authenticate(&state, &headers)?;

    let Some(state_url) = request.data.state_url.clone() else {
        return Err(ApiError(HubError::missing_param("state_url")));
    };

    if request.data.session_token().is_some() {
        // The OAuth dance completed and the hub echoed the token back;
        // the one-time store record is spent here.
        state
            .sessions
            .consume(&state_url)
            .await
            .map_err(HubError::Internal)?;
        tracing::info!(target: "campaign", "session resumed, returning field form");
        return Ok(Json(campaign_fields()).into_response());
    }

    // Not authenticated against the CRM yet: seal the callback URL into a
    // continuation token and hand back a login link.
    let sealed = state
        .codec
        .encode(&StatePayload::new(state_url.as_str()))
        .map_err(|_| HubError::Internal(anyhow!("state token encode failed")))?;
    let login = FormField::oauth_link(
        "login",
        "Log in",
        "Log in to your CRM account.",
        state.oauth.authorize_url(&sealed),
    );
    tracing::info!(target: "campaign", "no session token, returning login link");
    Ok(Json(vec![login]).into_response())
}

/// Browser-facing OAuth callback. Carries no hub credential (the third
/// party redirects straight here), so the continuation token is the only
/// thing tying the request to a workflow.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(params): Query<OAuthCallbackParams>,
) -> ApiResult<Response> {
    if let Some(error) = params.error {
        tracing::warn!(target: "campaign", error = %error, "authorization server returned an error");
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": error,
                "error_description": params.error_description,
            })),
        )
            .into_response());
    }

    let (Some(code), Some(sealed)) = (params.code, params.state) else {
        return Err(ApiError(HubError::Token));
    };
    let payload = state.codec.decode(&sealed)?;

    let granted = state
        .oauth
        .exchange(&GrantRequest::AuthorizationCode { code })
        .await?;
    state
        .sessions
        .store(&payload.state_url, &granted.access_token)
        .await
        .map_err(HubError::Internal)?;
    tracing::info!(target: "campaign", "token stored, redirecting back to form");

    Ok(Redirect::to(&state.config.form_redirect_url).into_response())
}

pub async fn execute(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Response> {
    authenticate(&state, &headers)?;
    let token = require_session_token(&request)?;

    let mut errors = ValidationErrors::new();
    let name = request.require("campaign_name", &mut errors);
    let start_date = request.require("start_date", &mut errors);
    let end_date = request.require("end_date", &mut errors);
    let status = request.require("campaign_status", &mut errors);
    let campaign_type = request.require("campaign_type", &mut errors);
    if let Some(d) = start_date {
        require_date("start_date", d, &mut errors);
    }
    if let Some(d) = end_date {
        require_date("end_date", d, &mut errors);
    }

    let (Some(name), Some(start_date), Some(end_date), Some(status), Some(campaign_type)) =
        (name, start_date, end_date, status, campaign_type)
    else {
        return Err(ApiError::from(errors));
    };
    errors.into_result().map_err(HubError::Validation)?;

    let record = json!({
        "attributes": {"type": "Campaign"},
        "Name": name,
        "StartDate": start_date,
        "EndDate": end_date,
        "Status": status,
        "Type": campaign_type,
    });
    state.crm.create_records(&token, vec![record]).await?;

    Ok((StatusCode::OK, Json(json!({}))).into_response())
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

fn campaign_fields() -> Vec<FormField> {
    vec![
        FormField::text("campaign_name", "Campaign Name")
            .with_description("Identifying name of the campaign")
            .required(),
        FormField::text("start_date", "Start Date")
            .with_description("Start date of the campaign, format YYYY-MM-DD")
            .required(),
        FormField::text("end_date", "End Date")
            .with_description("End date of the campaign, format YYYY-MM-DD")
            .required(),
        FormField::text("campaign_status", "Campaign Status")
            .with_description("Status of the campaign")
            .required(),
        FormField::text("campaign_type", "Campaign Type")
            .with_description("Type of the campaign")
            .required(),
    ]
}
