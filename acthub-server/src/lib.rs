//! HTTP surface of the ActHub action bridge.

pub mod app_state;
pub mod config;
pub mod crm;
pub mod error;
pub mod handlers;
pub mod icon;
pub mod router;

// Re-export key types
pub use app_state::AppState;
pub use config::{CrmConfig, HubConfig};
pub use error::{ApiError, ApiResult};
pub use router::router;
