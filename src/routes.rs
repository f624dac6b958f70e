// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{health, store, timeout, upload},
    state::AppState,
    utils::upload::UPLOADS_PREFIX,
};

/// Upper bound on a single upload request body.
const UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;

/// Assembles the companion server router.
///
/// * `/photos/upload` and static `/uploads` for profile pictures.
/// * `/timeout` for delayed deletion of abandoned sessions.
/// * `/db` exposing the server's document store.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let upload_routes = Router::new()
        .route("/photos/upload", post(upload::upload_photos))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    let store_routes = Router::new().route(
        "/{*path}",
        get(store::get_node)
            .put(store::put_node)
            .delete(store::delete_node),
    );

    Router::new()
        .route("/", get(health::root))
        .route("/timeout", post(timeout::schedule_timeout))
        .merge(upload_routes)
        .nest("/db", store_routes)
        .nest_service(UPLOADS_PREFIX, ServeDir::new(&state.config.upload_dir))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
