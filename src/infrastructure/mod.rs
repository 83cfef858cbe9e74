//! Infrastructure layer: HTTP gateway, configuration, and logging

pub mod api_client;
pub mod config;
pub mod logging;

// Re-export commonly used items
pub use api_client::{ApiClient, ApiError, ProductApi};
pub use config::AppConfig;
pub use logging::init_logging;
