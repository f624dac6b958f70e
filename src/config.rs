// src/config.rs

use std::env;
use std::time::Duration;
use dotenvy::dotenv;

/// Default cadence of the presence & sync poller.
pub const POLL_INTERVAL_MS: u64 = 3000;

/// Default delay before an abandoned session is deleted.
pub const GRACE_DELAY_MS: u64 = 5000;

/// Maximum number of files accepted by a single upload request.
pub const MAX_UPLOAD_FILES: usize = 12;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory where uploaded profile pictures are written.
    pub upload_dir: String,
    /// Base URL clients prefix relative upload paths with.
    pub public_url: String,
    /// Remote document store. `None` means the server keeps an in-memory store.
    pub store_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let upload_dir = env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "uploads".to_string());

        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        let store_url = env::var("STORE_URL").ok().filter(|url| !url.is_empty());

        Self {
            port,
            rust_log,
            upload_dir,
            public_url,
            store_url,
        }
    }
}

/// Timing knobs of the exam protocol on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamSettings {
    pub poll_interval: Duration,
    pub grace_delay: Duration,
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            grace_delay: Duration::from_millis(GRACE_DELAY_MS),
        }
    }
}
