// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wordquiz::config::Config;
use wordquiz::exam::{LocalScheduler, Scheduler};
use wordquiz::routes;
use wordquiz::state::AppState;
use wordquiz::store::{DocumentStore, MemoryStore, RestStore};

#[tokio::main]
async fn main() {
    // Load configuration from environment (and .env, if present)
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Pick the document store backing `/db` and `/timeout`
    let store: Arc<dyn DocumentStore> = match &config.store_url {
        Some(url) => {
            tracing::info!("Using remote document store at {}", url);
            Arc::new(RestStore::new(url).expect("STORE_URL must be a valid URL"))
        }
        None => {
            tracing::info!("Using in-memory document store");
            Arc::new(MemoryStore::new())
        }
    };

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");

    let scheduler: Arc<dyn Scheduler> = Arc::new(LocalScheduler::new(store.clone()));

    // Create AppState
    let state = AppState {
        store,
        scheduler,
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server started on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}
