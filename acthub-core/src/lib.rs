//! Shared domain types for the ActHub action bridge.

pub mod error;
pub mod fields;
pub mod integration;
pub mod payload;
pub mod validation;

// Convenient re-exports
pub use error::{HubError, HubResult};
pub use fields::{FieldType, FormField, SelectOption};
pub use integration::{ActionParam, Integration, IntegrationList};
pub use payload::{ActionData, ActionRequest};
pub use validation::ValidationErrors;
