//! Integration descriptors for the hub list endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level payload of the list endpoint: a labelled set of
/// integrations this bridge exposes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntegrationList {
    pub label: String,
    pub integrations: Vec<Integration>,
}

/// One action as advertised to the hub client. `form_url` and `url` are
/// absolute, built from the deployment's public base URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Integration {
    pub name: String,
    pub label: String,
    pub supported_action_types: Vec<String>,
    pub icon_data_uri: String,
    pub form_url: String,
    pub url: String,
    pub supported_formats: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_fields: Vec<Value>,
    pub supported_formattings: Vec<String>,
    pub supported_visualization_formattings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ActionParam>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub uses_oauth: bool,
}

/// A connection-level parameter the hub administrator fills in once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionParam {
    pub description: String,
    pub label: String,
    pub name: String,
    pub required: bool,
    pub sensitive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integration_serializes_expected_keys() {
        let integration = Integration {
            name: "campaign-creator".into(),
            label: "New Campaign".into(),
            supported_action_types: vec!["query".into()],
            icon_data_uri: "data:image/png;base64,AAAA".into(),
            form_url: "https://hub.example.com/campaign-form".into(),
            url: "https://hub.example.com/campaign-execute".into(),
            supported_formats: vec!["json".into()],
            required_fields: vec![serde_json::json!({"any_tag": ["crm_lead_id"]})],
            supported_formattings: vec!["formatted".into()],
            supported_visualization_formattings: vec!["noapply".into()],
            params: vec![ActionParam {
                description: "CRM domain name".into(),
                label: "CRM domain".into(),
                name: "crm_domain".into(),
                required: true,
                sensitive: false,
            }],
            uses_oauth: true,
        };
        let json = serde_json::to_value(&integration).unwrap();
        assert_eq!(json["form_url"], "https://hub.example.com/campaign-form");
        assert_eq!(json["uses_oauth"], true);
        assert_eq!(json["params"][0]["name"], "crm_domain");
        assert_eq!(json["required_fields"][0]["any_tag"][0], "crm_lead_id");
    }

    #[test]
    fn test_uses_oauth_omitted_when_false() {
        let integration = Integration {
            name: "post-creator".into(),
            label: "Post".into(),
            supported_action_types: vec!["cell".into()],
            icon_data_uri: String::new(),
            form_url: String::new(),
            url: String::new(),
            supported_formats: vec![],
            required_fields: vec![],
            supported_formattings: vec![],
            supported_visualization_formattings: vec![],
            params: vec![],
            uses_oauth: false,
        };
        let json = serde_json::to_value(&integration).unwrap();
        assert!(json.get("uses_oauth").is_none());
        assert!(json.get("required_fields").is_none());
    }
}
