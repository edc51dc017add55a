use serde::{Deserialize, Serialize};

/// Server-level configuration shared with the handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Secret the gateway signs webhook deliveries with.
    pub webhook_secret: String,
    /// Public base URL the gateway redirects users back to.
    pub return_base_url: String,
}
