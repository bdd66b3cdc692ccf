use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use configuration::Settings;
use database::DbRepository;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod export;
pub mod handlers;
pub mod password;
pub mod session;

/// The shared application state that all handlers can access.
///
/// Built once at startup from explicit settings; there is no global state.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
    pub settings: Settings,
}

impl AppState {
    pub fn new(db_repo: DbRepository, settings: Settings) -> Self {
        Self { db_repo, settings }
    }
}

/// Assembles every route and middleware layer around `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.settings.server.body_limit_bytes;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(AllowMethods::any())
        .allow_headers(AllowHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route(
            "/api/records",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route(
            "/api/records/:id",
            get(handlers::get_record).put(handlers::update_record),
        )
        .route("/api/records/:id/comments", post(handlers::add_comment))
        .route(
            "/api/comments/:id",
            put(handlers::update_comment).delete(handlers::delete_comment),
        )
        .route("/api/industries", get(handlers::list_industries))
        .route("/api/chart", get(handlers::chart))
        .route("/api/export", get(handlers::export))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}

/// Connects to the database, migrates it and serves until the process stops.
///
/// Tracing must already be initialised by the caller.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let db_pool = database::connect(&settings.database).await?;
    database::run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool);

    let purged = db_repo.delete_expired_sessions(chrono::Utc::now()).await?;
    if purged > 0 {
        tracing::info!(purged, "Removed expired sessions.");
    }

    let addr = settings.server.address();
    let app = build_router(Arc::new(AppState::new(db_repo, settings)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
