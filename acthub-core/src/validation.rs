//! Form parameter validation helpers

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Accumulated per-field validation failures, reported to the hub client
/// as `{ "success": false, "validation_errors": { field: reason } }`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.insert(field.into(), reason.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Ok(()) when nothing was recorded, otherwise hand the set back for
    /// conversion into an error response.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Strict `YYYY-MM-DD` check: the value must parse and round-trip with
/// zero-padded components, so `2024-1-2` is rejected like the hub UI
/// would reject it.
pub fn is_valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string() == value)
        .unwrap_or(false)
}

/// Record a validation error unless `value` is a well-formed date.
pub fn require_date(field: &str, value: &str, errors: &mut ValidationErrors) {
    if !is_valid_date(value) {
        errors.add(field, "Invalid date format. Please use YYYY-MM-DD format");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_dates() {
        assert!(is_valid_date("2025-01-31"));
        assert!(is_valid_date("1999-12-01"));
    }

    #[test]
    fn test_invalid_dates() {
        assert!(!is_valid_date("2025-1-31"));
        assert!(!is_valid_date("31-01-2025"));
        assert!(!is_valid_date("2025-02-30"));
        assert!(!is_valid_date("2025/01/31"));
        assert!(!is_valid_date("not a date"));
        assert!(!is_valid_date(""));
    }

    #[test]
    fn test_errors_accumulate() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.add("start_date", "Invalid date format. Please use YYYY-MM-DD format");
        errors.add("subject", "Missing required parameter");
        assert_eq!(errors.len(), 2);
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let mut errors = ValidationErrors::new();
        errors.add("due_date", "Missing required parameter");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"due_date": "Missing required parameter"}));
    }
}
