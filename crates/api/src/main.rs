use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use domain::services::NotificationService;
use shared::jwt::JwtSigner;

mod app;
mod config;
mod error;
mod middleware;
mod routes;
mod services;

use services::events::{spawn_topic_forwarder, BookEventBus};
use services::fcm::FcmNotificationService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging and metrics
    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics();

    info!("Starting E-Book Library API v{}", env!("CARGO_PKG_VERSION"));

    // Create database pool
    let db_config = persistence::db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        connect_timeout_secs: config.database.connect_timeout_secs,
        idle_timeout_secs: config.database.idle_timeout_secs,
    };
    let pool = persistence::db::create_pool(&db_config).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    // Bootstrap the default admin account if configured
    services::admin_bootstrap::bootstrap_admin(&pool, &config.admin).await?;

    // Token signer shared by auth routes and middleware
    let jwt = JwtSigner::from_secret(
        &config.jwt.secret,
        config.jwt.access_token_expiry_secs,
        config.jwt.refresh_token_expiry_secs,
        config.jwt.leeway_secs,
    )?;

    // Push notification service (optional)
    let notifier: Option<Arc<dyn NotificationService>> = if config.fcm.enabled {
        match FcmNotificationService::new(config.fcm.clone()) {
            Ok(service) => {
                info!(project_id = %config.fcm.project_id, "FCM push notifications enabled");
                Some(Arc::new(service))
            }
            Err(e) => {
                warn!(error = %e, "Failed to initialize FCM - push notifications disabled");
                None
            }
        }
    } else {
        warn!("FCM is disabled - push notifications will not be sent");
        None
    };

    // Event bus fanning out new-book events to WebSocket clients and FCM
    let events = BookEventBus::default();
    if let Some(ref notifier) = notifier {
        spawn_topic_forwarder(&events, notifier.clone());
    }

    // Build application
    let addr = config.socket_addr()?;
    let app = app::create_app(config, pool, jwt, events, notifier);

    // Start server
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
