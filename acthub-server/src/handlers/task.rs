//! Task creation action with a dynamically-built form
//!
//! The form pulls its select options live from the CRM: recent task
//! categories, customer groups for the "related to" field, and users for
//! assignment, defaulting to the record the action was triggered on and
//! the service account's own identity.

use super::{authenticate, service_account_token};
use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};
use acthub_core::validation::require_date;
use acthub_core::{ActionRequest, FormField, SelectOption, ValidationErrors};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};

/// Record type the created tasks are filed under.
const TASK_RECORD_TYPE_ID: &str = "0122w000001MHouAAG";

pub async fn form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Response> {
    authenticate(&state, &headers)?;

    let cell_value = request.cell_value().to_string();
    let token = service_account_token(&state).await?;

    let categories = state
        .crm
        .query(
            &token,
            "SELECT Category__c FROM Task WHERE CreatedDate >= LAST_N_MONTHS:3 GROUP BY Category__c",
        )
        .await?;
    let category_options = record_options(&categories, "Category__c", "Category__c");

    // "Related To" defaults to the record the action was triggered on,
    // resolved to its display name; absence of a match is not an error.
    let mut related_options = Vec::new();
    if !cell_value.is_empty() {
        let soql = format!(
            "SELECT Name FROM Customer_Group__c WHERE Id = '{}'",
            cell_value.replace('\'', "\\'")
        );
        let named = state.crm.query(&token, &soql).await?;
        if let Some(name) = named["records"]
            .get(0)
            .and_then(|r| r["Name"].as_str())
        {
            related_options.push(SelectOption::new(cell_value.clone(), name));
        }
    }
    let groups = state
        .crm
        .query(&token, "SELECT Id, Name FROM Customer_Group__c LIMIT 25")
        .await?;
    related_options.extend(record_options(&groups, "Id", "Name"));

    let user = state.crm.userinfo(&token).await?;
    let mut owner_options = Vec::new();
    let mut own_user_id = None;
    if let (Some(id), Some(name)) = (user["user_id"].as_str(), user["name"].as_str()) {
        owner_options.push(SelectOption::new(id, name));
        own_user_id = Some(id.to_string());
    }
    let users = state
        .crm
        .query(&token, "SELECT Id, Name FROM User LIMIT 25")
        .await?;
    owner_options.extend(record_options(&users, "Id", "Name"));

    let mut related = FormField::select("related_to", "Related To", related_options).required();
    if !cell_value.is_empty() {
        related = related.with_default(cell_value);
    }
    let mut assigned = FormField::select("assigned_to", "Assigned To", owner_options).required();
    if let Some(id) = own_user_id {
        assigned = assigned.with_default(id);
    }

    let fields = vec![
        FormField::select(
            "subject",
            "Subject",
            vec![
                SelectOption::new("Call", "Call"),
                SelectOption::new("Send Letter", "Send Letter"),
                SelectOption::new("Send Quote", "Send Quote"),
                SelectOption::new("Other", "Other"),
            ],
        )
        .required(),
        FormField::select("category", "Category", category_options).required(),
        FormField::date("due_date", "Due Date")
            .with_description("Format YYYY-MM-DD")
            .required(),
        FormField::textarea("description", "Description")
            .with_description("Tip: Type Command + period to insert quick text.")
            .required(),
        related,
        assigned,
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
    let subject = request.require("subject", &mut errors);
    let category = request.require("category", &mut errors);
    let due_date = request.require("due_date", &mut errors);
    let description = request.require("description", &mut errors);
    let related_to = request.require("related_to", &mut errors);
    let assigned_to = request.require("assigned_to", &mut errors);
    if let Some(d) = due_date {
        require_date("due_date", d, &mut errors);
    }

    let (
        Some(subject),
        Some(category),
        Some(due_date),
        Some(description),
        Some(related_to),
        Some(assigned_to),
    ) = (subject, category, due_date, description, related_to, assigned_to)
    else {
        return Err(ApiError::from(errors));
    };
    errors.into_result().map_err(acthub_core::HubError::Validation)?;

    let token = service_account_token(&state).await?;
    let record = json!({
        "attributes": {"type": "Task"},
        "Subject": subject,
        "Category__c": category,
        "ActivityDate": due_date,
        "Description": description,
        "WhatId": related_to,
        "OwnerId": assigned_to,
        "RecordTypeId": TASK_RECORD_TYPE_ID,
    });
    state.crm.create_records(&token, vec![record]).await?;

    Ok((StatusCode::OK, Json(json!({}))).into_response())
}

fn record_options(doc: &Value, name_key: &str, label_key: &str) -> Vec<SelectOption> {
    doc["records"]
        .as_array()
        .map(|records| {
            records
                .iter()
                .filter_map(|record| {
                    let name = record[name_key].as_str()?;
                    let label = record[label_key].as_str()?;
                    Some(SelectOption::new(name, label))
                })
                .collect()
        })
        .unwrap_or_default()
}
