//! Request handlers, one module per action
//!
//! Every handler authenticates first and short-circuits on rejection;
//! nothing else runs for an untrusted caller.

pub mod campaign;
pub mod list;
pub mod poll;
pub mod post;
pub mod question;
pub mod task;

use crate::app_state::AppState;
use crate::error::ApiError;
use acthub_authflow::GrantRequest;
use acthub_core::{ActionRequest, HubError};
use axum::http::{header, HeaderMap};

/// Gate every handler on the hub credential.
pub(crate) fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    state
        .authenticator
        .authenticate(authorization)
        .map_err(ApiError::from)
}

/// Execute-phase requirement: the access token must already ride in the
/// echoed session context.
pub(crate) fn require_session_token(request: &ActionRequest) -> Result<String, ApiError> {
    request.data.session_token().ok_or(ApiError(HubError::Token))
}

/// Service-account token for the directly-executed actions; one password
/// grant per invocation, no caching across stateless invocations.
pub(crate) async fn service_account_token(state: &AppState) -> Result<String, ApiError> {
    let grant = GrantRequest::Password {
        username: state.config.crm.username.clone(),
        password: state.config.crm.password.clone(),
    };
    let granted = state.oauth.exchange(&grant).await?;
    Ok(granted.access_token)
}
