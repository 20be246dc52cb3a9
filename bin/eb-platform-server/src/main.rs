//! Event Booking Platform Server
//!
//! Serves the booking REST API:
//! - POST /token - password login
//! - /events - event CRUD (bearer token required)
//! - GET /health, Swagger UI at /swagger-ui
//!
//! Configuration comes from `EB_CONFIG` (TOML) and `EB_*` environment
//! variables; see `eb_common::config` for the full table.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use eb_common::{init_logging, AppConfig, StorageBackend};
use eb_platform::api::BookingApiDoc;
use eb_platform::repository::{
    EventRepository, InMemoryEventRepository, InMemoryUserRepository, MongoEventRepository,
    MongoUserRepository, UserRepository,
};
use eb_platform::seed::DevDataSeeder;
use eb_platform::service::{AuthConfig, PasswordService};
use eb_platform::PlatformServices;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.log);
    config.validate_platform()?;

    info!("Starting Event Booking Platform Server");
    if config.auth.jwt_secret.is_empty() {
        warn!("EB_JWT_SECRET not set; using the development signing secret");
    }

    // Initialize repositories
    let (user_repo, event_repo, mongo_client): (
        Arc<dyn UserRepository>,
        Arc<dyn EventRepository>,
        Option<mongodb::Client>,
    ) = match config.storage {
        StorageBackend::Mongo => {
            info!(url = %config.mongo.url, database = %config.mongo.database, "Connecting to MongoDB");
            let client = mongodb::Client::with_uri_str(&config.mongo.url).await?;
            let db = client.database(&config.mongo.database);

            let users = MongoUserRepository::new(&db);
            let events = MongoEventRepository::new(&db);
            users.ensure_indexes().await?;
            events.ensure_indexes().await?;

            let users: Arc<dyn UserRepository> = Arc::new(users);
            let events: Arc<dyn EventRepository> = Arc::new(events);
            (users, events, Some(client))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on exit");
            let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
            let events: Arc<dyn EventRepository> = Arc::new(InMemoryEventRepository::new());
            (users, events, None)
        }
    };
    info!("Repositories initialized");

    let auth_config =
        AuthConfig::new(config.jwt_secret()).with_expiry_minutes(config.auth.token_expiry_minutes);
    let services = PlatformServices::new(user_repo, event_repo, auth_config, PasswordService::default());

    // Seed development data if in dev mode
    if config.dev.enabled {
        let seeder = DevDataSeeder::new(services.user_repo.clone(), services.password_service.clone());
        if let Err(e) = seeder.seed(&config.dev.users).await {
            warn!(error = %e, "Dev data seeding failed");
        }
    }

    let app = eb_platform::api::router(&services)
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", BookingApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let api_addr = config.server.bind_addr();
    let listener = TcpListener::bind(&api_addr).await?;
    info!("API server listening on http://{}", api_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server drained");

    if let Some(client) = mongo_client {
        client.shutdown().await;
        info!("MongoDB client closed");
    }

    info!("Event Booking Platform Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
