// src/handlers/timeout.rs

use std::{sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError, exam::Scheduler, models::schedule::TimeoutRequest, utils::path::normalize,
};

/// Schedules deletion of `target` after `time` milliseconds.
///
/// Used by hosts whose app was backgrounded. There is no way to cancel it.
pub async fn schedule_timeout(
    State(scheduler): State<Arc<dyn Scheduler>>,
    Json(payload): Json<TimeoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let target = normalize(&payload.target)?;
    if target.is_empty() {
        return Err(AppError::BadRequest("Refusing to schedule deletion of the root".to_string()));
    }

    scheduler
        .schedule_delete(&target, Duration::from_millis(payload.time))
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "message": "Deletion scheduled",
            "target": target,
            "time": payload.time,
        })),
    ))
}
