//! Shared-secret authentication of inbound hub requests

use acthub_core::HubError;

/// Verifies that a request genuinely originates from the hub client.
/// Built once at startup from the configured shared secret; every handler
/// calls [`Authenticator::authenticate`] before doing anything else.
#[derive(Clone)]
pub struct Authenticator {
    secret: String,
}

impl Authenticator {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// Check the `Authorization` header value. The hub client sends
    /// `Token token="<secret>"`; a bare secret is accepted too.
    ///
    /// Missing header rejects with 401, mismatched credential with 403.
    /// The rejection is returned to the caller verbatim.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<(), HubError> {
        let Some(value) = authorization else {
            tracing::warn!(target: "authenticate", "request without authorization header");
            return Err(HubError::unauthorized("authorization header required"));
        };

        if Self::extract_credential(value) == self.secret {
            Ok(())
        } else {
            tracing::warn!(target: "authenticate", "request with invalid credential");
            Err(HubError::forbidden("invalid authorization credential"))
        }
    }

    fn extract_credential(value: &str) -> &str {
        let trimmed = value.trim();
        match trimmed.strip_prefix("Token token=") {
            Some(quoted) => quoted.trim_matches('"'),
            None => trimmed,
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> Authenticator {
        Authenticator::new("hub-secret")
    }

    #[test]
    fn test_missing_header_is_401() {
        match auth().authenticate(None) {
            Err(HubError::Authentication { status, .. }) => assert_eq!(status, 401),
            other => panic!("expected 401 rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_credential_is_403() {
        match auth().authenticate(Some("Token token=\"not-it\"")) {
            Err(HubError::Authentication { status, .. }) => assert_eq!(status, 403),
            other => panic!("expected 403 rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_hub_token_format_accepted() {
        assert!(auth().authenticate(Some("Token token=\"hub-secret\"")).is_ok());
    }

    #[test]
    fn test_bare_secret_accepted() {
        assert!(auth().authenticate(Some("hub-secret")).is_ok());
    }

    #[test]
    fn test_empty_header_rejected() {
        assert!(auth().authenticate(Some("")).is_err());
    }
}
