//! Hub list endpoint: the full set of integrations this bridge exposes

use super::authenticate;
use crate::app_state::AppState;
use crate::config::HubConfig;
use crate::error::ApiResult;
use crate::icon::ICON_DATA_URI;
use acthub_core::{ActionParam, Integration, IntegrationList};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Response};

pub async fn integrations(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    authenticate(&state, &headers)?;

    let list = IntegrationList {
        label: "CRM Action Hub".to_string(),
        integrations: vec![
            integration(&state.config, "campaign-creator", "New Campaign", &["query"], true),
            integration(&state.config, "poll-creator", "Poll", &["query", "cell", "dashboard"], false),
            integration(&state.config, "post-creator", "Post", &["query", "cell", "dashboard"], false),
            integration(&state.config, "question-creator", "Question", &["query", "cell", "dashboard"], false),
            integration(&state.config, "task-creator", "New Task", &["query", "cell", "dashboard"], false),
        ],
    };

    tracing::debug!(target: "list", integrations = list.integrations.len(), "returning integration list");
    Ok(Json(list).into_response())
}

fn integration(
    config: &HubConfig,
    name: &str,
    label: &str,
    action_types: &[&str],
    uses_oauth: bool,
) -> Integration {
    // Route prefix is the integration name minus the "-creator" suffix
    let slug = name.strip_suffix("-creator").unwrap_or(name);
    Integration {
        name: name.to_string(),
        label: label.to_string(),
        supported_action_types: action_types.iter().map(|s| s.to_string()).collect(),
        icon_data_uri: ICON_DATA_URI.to_string(),
        form_url: config.public_url(&format!("{slug}-form")),
        url: config.public_url(&format!("{slug}-execute")),
        supported_formats: vec!["json".to_string(), "csv_zip".to_string()],
        required_fields: vec![serde_json::json!({"any_tag": ["crm_lead_id"]})],
        supported_formattings: vec!["formatted".to_string()],
        supported_visualization_formattings: vec!["noapply".to_string()],
        params: vec![ActionParam {
            description: "CRM domain name, e.g. https://MyDomainName.my.crm.example.com".to_string(),
            label: "CRM domain".to_string(),
            name: "crm_domain".to_string(),
            required: true,
            sensitive: false,
        }],
        uses_oauth,
    }
}
