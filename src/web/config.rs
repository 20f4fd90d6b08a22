//! Web server configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the scrape endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Host to bind the server to
    pub host: String,
    /// Port to bind the server to
    pub port: u16,
    /// Whether to enable CORS
    pub enable_cors: bool,
    /// Path the exposition text is served on
    pub metrics_path: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: crate::DEFAULT_WEB_PORT,
            enable_cors: false,
            metrics_path: "/metrics".to_string(),
        }
    }
}

impl WebConfig {
    /// Scrape endpoint bound to `host:port`, other settings default.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Allow cross-origin reads of the health and metrics routes.
    pub fn with_cors(mut self, enable_cors: bool) -> Self {
        self.enable_cors = enable_cors;
        self
    }

    /// Serve metrics on a different path. A leading `/` is added if missing.
    pub fn with_metrics_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.metrics_path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        self
    }

    /// `host:port` string handed to the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
