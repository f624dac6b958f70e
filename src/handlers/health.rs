// src/handlers/health.rs

/// Liveness probe.
pub async fn root() -> &'static str {
    "Server is running"
}
