//! Scrape endpoint serving the sensor gauges.
//!
//! The server only ever reads the gauge registry through a
//! [`PrometheusHandle`]; it never touches the serial stream.

pub mod config;
pub mod handlers;
pub mod router;

// Re-export commonly used items
pub use config::WebConfig;
pub use router::create_app;

use crate::error::{Result, SensorError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub handle: PrometheusHandle,
    pub device: Arc<str>,
    pub metrics_path: Arc<str>,
}

impl AppState {
    pub fn new(handle: PrometheusHandle, device: &str, metrics_path: &str) -> Self {
        Self {
            handle,
            device: Arc::from(device),
            metrics_path: Arc::from(metrics_path),
        }
    }
}

/// Start the web server and run until the shutdown flag is raised.
pub async fn start_web_server(
    config: WebConfig,
    state: AppState,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let app = create_app(&config, state)?;

    // Parse the bind address
    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| SensorError::config_error(format!("Invalid bind address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SensorError::web_server_error(format!("Failed to bind to address: {}", e)))?;

    info!("Serving metrics on http://{}{}", addr, config.metrics_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
            info!("Web server shutting down");
        })
        .await
        .map_err(|e| SensorError::web_server_error(format!("Server error: {}", e)))?;

    Ok(())
}
