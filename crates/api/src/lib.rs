//! # Clinic API
//!
//! The API crate provides the HTTP boundary of the clinic appointment scheduler.
//! It exposes doctors, their free slots and appointment CRUD as JSON resources.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into `SchedulingService` calls
//! - **Middleware**: Map scheduling errors onto HTTP responses
//! - **Config**: Handle environment and application configuration
//!
//! All conflict and availability decisions live in `clinic-core`; this crate
//! only wires the PostgreSQL collaborators from `clinic-db` into it.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error mapping
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{Router, http::HeaderValue};
use clinic_core::service::SchedulingService;
use clinic_db::store::{PgAppointmentRepository, PgDoctorDirectory};
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Booking and availability logic with its collaborators injected
    pub scheduler: SchedulingService,
}

impl ApiState {
    pub fn new(scheduler: SchedulingService) -> Self {
        Self { scheduler }
    }

    /// Wires the PostgreSQL-backed collaborators into a scheduler configured
    /// from `config`.
    pub fn from_pool(db_pool: PgPool, config: &config::ApiConfig) -> Self {
        let scheduler = SchedulingService::new(
            Arc::new(PgDoctorDirectory::new(db_pool.clone())),
            Arc::new(PgAppointmentRepository::new(db_pool)),
        )
        .with_zone(config.clinic_timezone)
        .with_slot_options(config.slot_options);

        Self::new(scheduler)
    }
}

/// Builds the application router with all routes attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Doctor and slot endpoints
        .merge(routes::doctor::routes())
        // Appointment endpoints
        .merge(routes::appointment::routes())
        .with_state(state)
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<_> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_origin(AllowOrigin::list(allowed))
}

/// Starts the API server with the provided configuration and database connection
///
/// The pool's lifecycle is owned by the caller; the scheduler only sees it
/// through the repository adapters.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = clinic_api::config::ApiConfig::from_env()?;
/// let db_pool = clinic_db::create_pool(&config.database_url).await?;
/// clinic_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        "Scheduling in {} with {}-minute slots",
        config.clinic_timezone, config.slot_options.length_minutes
    );

    let state = Arc::new(ApiState::from_pool(db_pool, &config));

    let app = app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
            .layer(cors_layer(config.cors_origins.as_deref())),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
