//! Error taxonomy shared across the workspace

use crate::validation::ValidationErrors;
use thiserror::Error;

pub type HubResult<T> = Result<T, HubError>;

/// Top-level error enum for the action bridge.
///
/// The HTTP mapping lives in the server crate; variants carry everything a
/// handler needs to answer the hub client without re-interpreting the
/// failure.
#[derive(Debug, Error)]
pub enum HubError {
    /// The request did not carry a valid hub credential.
    #[error("authentication failed: {message}")]
    Authentication { status: u16, message: String },

    /// One or more form fields are missing or malformed.
    #[error("validation failed")]
    Validation(ValidationErrors),

    /// Continuation token missing, undecodable, or its session is gone.
    /// Callers treat this as "user must (re-)authenticate", not a hard
    /// failure.
    #[error("invalid or missing state token")]
    Token,

    /// The CRM answered with a non-2xx status. Status and body are passed
    /// through to the hub client verbatim.
    #[error("upstream returned status {status}")]
    Upstream { status: u16, body: String },

    /// The outbound call never produced an upstream verdict (timeout,
    /// connection refused). Distinct from `Upstream`; never reported with
    /// an upstream status code.
    #[error("upstream request failed: {0}")]
    Network(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl HubError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Authentication { status: 401, message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Authentication { status: 403, message: message.into() }
    }

    /// Single-field validation failure.
    pub fn missing_param(name: &str) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(name, "Missing required parameter");
        Self::Validation(errors)
    }
}

impl From<ValidationErrors> for HubError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_helpers_carry_status() {
        match HubError::unauthorized("no header") {
            HubError::Authentication { status, .. } => assert_eq!(status, 401),
            other => panic!("unexpected variant: {other:?}"),
        }
        match HubError::forbidden("bad secret") {
            HubError::Authentication { status, .. } => assert_eq!(status, 403),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_missing_param_names_field() {
        match HubError::missing_param("due_date") {
            HubError::Validation(errors) => {
                assert_eq!(errors.get("due_date"), Some("Missing required parameter"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
