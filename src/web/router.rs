//! Web application router and middleware setup.

use crate::error::{Result, SensorError};
use crate::web::config::WebConfig;
use crate::web::{handlers, AppState};
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Routes served regardless of configuration.
pub const BUILTIN_ROUTES: [&str; 2] = ["/", "/api/health"];

/// Create the axum application with all routes and middleware.
///
/// Fails when the metrics path collides with a built-in route.
pub fn create_app(config: &WebConfig, state: AppState) -> Result<Router> {
    if BUILTIN_ROUTES.contains(&config.metrics_path.as_str()) {
        return Err(SensorError::config_error(format!(
            "Metrics path {} is already used by a built-in route",
            config.metrics_path
        )));
    }

    let mut app = Router::new()
        .route(&config.metrics_path, get(handlers::metrics))
        .route("/api/health", get(handlers::health_check))
        .route("/", get(handlers::index))
        .with_state(state);

    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    Ok(app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())))
}
