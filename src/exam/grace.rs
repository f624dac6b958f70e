// src/exam/grace.rs

//! Delayed cleanup of sessions whose host left the foreground.
//!
//! A suspended app cannot run its own timers, so the deletion is handed to a
//! scheduler that lives elsewhere (normally the companion server). Once
//! scheduled it cannot be cancelled: a teacher who comes back within the
//! delay still loses the session.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{membership::Membership, paths};
use crate::{error::AppError, models::schedule::TimeoutRequest, store::DocumentStore};

/// App lifecycle transitions delivered by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Foreground,
    Background,
    Inactive,
}

/// Deletes a store path once a delay has elapsed.
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn schedule_delete(&self, target: &str, delay: Duration) -> Result<(), AppError>;
}

/// Runs deletions as tokio tasks against a store it holds directly.
/// This is what the companion server uses behind `POST /timeout`.
#[derive(Clone)]
pub struct LocalScheduler {
    store: Arc<dyn DocumentStore>,
}

impl LocalScheduler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Scheduler for LocalScheduler {
    async fn schedule_delete(&self, target: &str, delay: Duration) -> Result<(), AppError> {
        let store = self.store.clone();
        let target = target.to_string();

        tracing::info!(path = %target, delay_ms = delay.as_millis() as u64, "Deletion scheduled");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match store.remove(&target).await {
                Ok(()) => tracing::info!(path = %target, "Scheduled deletion done"),
                Err(e) => tracing::error!(path = %target, "Scheduled deletion failed: {:?}", e),
            }
        });

        Ok(())
    }
}

/// Asks a remote server to run the deletion (`POST {base}/timeout`).
#[derive(Debug, Clone)]
pub struct HttpScheduler {
    client: Client,
    endpoint: Url,
}

impl HttpScheduler {
    pub fn new(api_url: &str) -> Result<Self, AppError> {
        let base = if api_url.ends_with('/') {
            api_url.to_string()
        } else {
            format!("{}/", api_url)
        };
        let endpoint = Url::parse(&base)
            .and_then(|base| base.join("timeout"))
            .map_err(|e| AppError::BadRequest(format!("Invalid scheduler URL: {}", e)))?;

        Ok(Self {
            client: Client::new(),
            endpoint,
        })
    }
}

#[async_trait]
impl Scheduler for HttpScheduler {
    async fn schedule_delete(&self, target: &str, delay: Duration) -> Result<(), AppError> {
        let request = TimeoutRequest {
            time: delay.as_millis() as u64,
            target: target.to_string(),
        };

        self.client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Reacts to lifecycle edges of the teacher's app.
#[derive(Clone)]
pub struct GraceTimer {
    scheduler: Arc<dyn Scheduler>,
    delay: Duration,
}

impl GraceTimer {
    pub fn new(scheduler: Arc<dyn Scheduler>, delay: Duration) -> Self {
        Self { scheduler, delay }
    }

    /// Schedules deletion of both session records when a hosting teacher's app
    /// goes to the background or becomes inactive.
    ///
    /// Returns how many deletions were accepted by the scheduler. Scheduler
    /// failures are logged and otherwise ignored.
    pub async fn on_lifecycle(&self, membership: &Membership, next: Lifecycle) -> usize {
        if next == Lifecycle::Foreground || !membership.is_teacher() {
            return 0;
        }
        let Some(code) = membership.code() else {
            return 0;
        };

        let mut scheduled = 0;
        for target in [format!("/{}", paths::open(code)), format!("/{}", paths::running(code))] {
            match self.scheduler.schedule_delete(&target, self.delay).await {
                Ok(()) => scheduled += 1,
                Err(e) => tracing::error!(code = %code, path = %target, "Error calling timeout route: {:?}", e),
            }
        }

        scheduled
    }
}
