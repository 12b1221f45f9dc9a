//! Inbound request payloads from the hub client

use crate::validation::ValidationErrors;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Body of the form and execute endpoints:
/// `{ form_params: {...}, data: { state_url, state_json, value } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionRequest {
    #[serde(default)]
    pub form_params: Map<String, Value>,
    #[serde(default)]
    pub data: ActionData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionData {
    /// Callback URL the hub client expects the OAuth dance to resolve
    /// against; doubles as the session correlation key. Opaque to us.
    #[serde(default)]
    pub state_url: Option<String>,
    /// Session data echoed back by the hub. Arrives as a JSON object on
    /// some phases and as a string-encoded JSON document on others.
    #[serde(default)]
    pub state_json: Option<Value>,
    /// Cell or query value the action was triggered on.
    #[serde(default)]
    pub value: Option<String>,
}

impl ActionRequest {
    /// Fetch a required string form parameter, recording a validation
    /// error when absent or empty.
    pub fn require<'a>(&'a self, name: &str, errors: &mut ValidationErrors) -> Option<&'a str> {
        match self.form_params.get(name).and_then(Value::as_str) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                errors.add(name, "Missing required parameter");
                None
            }
        }
    }

    pub fn param<'a>(&'a self, name: &str) -> Option<&'a str> {
        self.form_params.get(name).and_then(Value::as_str)
    }

    /// Cell value the action was invoked on, empty when triggered from a
    /// query context.
    pub fn cell_value(&self) -> &str {
        self.data.value.as_deref().unwrap_or("")
    }
}

impl ActionData {
    /// Normalized view of `state_json`, tolerating both encodings the hub
    /// client uses.
    pub fn state_json_map(&self) -> Map<String, Value> {
        match &self.state_json {
            Some(Value::Object(map)) => map.clone(),
            Some(Value::String(raw)) => {
                serde_json::from_str::<Value>(raw)
                    .ok()
                    .and_then(|v| v.as_object().cloned())
                    .unwrap_or_default()
            }
            _ => Map::new(),
        }
    }

    /// Access token carried in the echoed session, if the OAuth dance has
    /// completed for this workflow.
    pub fn session_token(&self) -> Option<String> {
        self.state_json_map()
            .get("token")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: Value) -> ActionRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_require_present_and_missing() {
        let req = request(serde_json::json!({
            "form_params": {"content": "hello"},
            "data": {}
        }));
        let mut errors = ValidationErrors::new();
        assert_eq!(req.require("content", &mut errors), Some("hello"));
        assert_eq!(req.require("subject", &mut errors), None);
        assert_eq!(errors.get("subject"), Some("Missing required parameter"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_state_json_as_object() {
        let req = request(serde_json::json!({
            "data": {"state_url": "https://hub/x", "state_json": {"token": "abc"}}
        }));
        assert_eq!(req.data.session_token(), Some("abc".to_string()));
    }

    #[test]
    fn test_state_json_as_encoded_string() {
        let req = request(serde_json::json!({
            "data": {"state_json": "{\"token\": \"abc\"}"}
        }));
        assert_eq!(req.data.session_token(), Some("abc".to_string()));
    }

    #[test]
    fn test_state_json_absent_or_garbage() {
        let req = request(serde_json::json!({"data": {}}));
        assert_eq!(req.data.session_token(), None);

        let req = request(serde_json::json!({"data": {"state_json": "not json"}}));
        assert_eq!(req.data.session_token(), None);

        let req = request(serde_json::json!({"data": {"state_json": 42}}));
        assert_eq!(req.data.session_token(), None);
    }

    #[test]
    fn test_cell_value_defaults_empty() {
        let req = request(serde_json::json!({"data": {"value": "001xx0000003"}}));
        assert_eq!(req.cell_value(), "001xx0000003");
        let req = request(serde_json::json!({"data": {}}));
        assert_eq!(req.cell_value(), "");
    }
}
