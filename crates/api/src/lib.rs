//! # Turnero API
//!
//! The API crate provides the web server for the Turnero booking engine. It
//! exposes RESTful endpoints for appointments, schedule blocks, customers,
//! services and staff.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into [`Calendar`] and directory calls
//! - **Middleware**: Password hashing and the error-to-response mapping
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework. Storage sits behind the
//! `turnero_core::store` traits, so the same router runs on PostgreSQL in
//! production and on the in-memory store in tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Authentication helpers and error mapping
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::{Method, StatusCode, header},
};
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;
use turnero_core::{Calendar, store::DirectoryStore};
use turnero_db::{DbPool, PgStore};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Booking engine over appointments and schedule blocks
    pub calendar: Calendar,
    /// Customers, services and staff
    pub directory: Arc<dyn DirectoryStore>,
}

impl ApiState {
    pub fn new(calendar: Calendar) -> Self {
        let directory = calendar.directory().clone();
        Self {
            calendar,
            directory,
        }
    }
}

/// Builds the router with every endpoint and request tracing, without the
/// network-facing layers added by [`start_server`].
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Staff sign-in
        .merge(routes::auth::routes())
        // Directory endpoints
        .merge(routes::staff::routes())
        .merge(routes::customers::routes())
        .merge(routes::services::routes())
        // Calendar endpoints
        .merge(routes::appointments::routes())
        .merge(routes::blocks::routes())
        // Attach shared state to all routes
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Starts the API server with the provided configuration and database connection
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = turnero_api::config::ApiConfig::from_env()?;
/// let db_pool = turnero_db::create_pool(&config.database_url).await?;
/// turnero_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let store = Arc::new(PgStore::new(db_pool));
    let calendar = Calendar::new(config.calendar.clone(), store.clone(), store);
    let state = Arc::new(ApiState::new(calendar));
    info!(
        "Calendar open {}-{} with {} minute slots",
        config.calendar.opening, config.calendar.closing, config.calendar.slot_minutes
    );

    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allow_origin(
                origins
                    .iter()
                    .filter_map(|origin| match origin.parse() {
                        Ok(origin) => Some(origin),
                        Err(_) => {
                            warn!("Ignoring invalid CORS origin `{}`", origin);
                            None
                        }
                    })
                    .collect::<Vec<_>>(),
            )
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|_: BoxError| async {
                StatusCode::REQUEST_TIMEOUT
            }))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
