use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::NotificationService;
use shared::jwt::JwtSigner;

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin, require_user_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{admin, auth, books, files, health, notifications, uploads, ws};
use crate::services::events::BookEventBus;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: JwtSigner,
    pub events: BookEventBus,
    pub notifier: Option<Arc<dyn NotificationService>>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(
    config: Config,
    pool: PgPool,
    jwt: JwtSigner,
    events: BookEventBus,
    notifier: Option<Arc<dyn NotificationService>>,
) -> Router {
    let config = Arc::new(config);

    // Rate limiting is enabled when the per-minute limit is non-zero
    let rate_limiter = if config.security.auth_rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.auth_rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        events,
        notifier,
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Authentication endpoints: public, but rate limited per client IP
    let auth_routes = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::get_book))
        .route("/files/:filename", get(files::serve_file))
        .route("/ws", get(ws::ws_handler))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    // Routes for any authenticated user (read-status tracking)
    let user_routes = Router::new()
        .route("/books/read", get(books::list_read))
        .route("/books/unread", get(books::list_unread))
        .route("/books/:id/mark-read", put(books::mark_read))
        .route("/books/:id/mark-unread", put(books::mark_unread))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Admin-only routes (catalog management, uploads, direct pushes)
    let admin_routes = Router::new()
        .route("/books", post(books::create_book))
        .route("/books/:id", delete(books::delete_book))
        .route(
            "/upload/pdf",
            post(uploads::upload_pdf)
                .layer(DefaultBodyLimit::max(config.upload.max_size_bytes)),
        )
        .route("/notifications/send", post(notifications::send_notification))
        .route("/admin/dashboard", get(admin::dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(auth_routes)
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
