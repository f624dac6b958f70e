// src/exam/submission.rs

use std::collections::HashMap;

use serde_json::Value;

use super::{code::SessionCode, paths};
use crate::{
    error::AppError,
    models::submission::Submission,
    store::{self, DocumentStore},
};

/// Records a student's answer set for a session.
///
/// There is no "already submitted" guard: a second call overwrites the first.
/// Timestamps are written at millisecond precision.
/// On failure the caller still owns `submission` and can show it locally.
pub async fn submit(
    store: &dyn DocumentStore,
    code: &SessionCode,
    uid: &str,
    submission: &Submission,
) -> Result<(), AppError> {
    store::write(store, &paths::submission(code, uid), &submission.normalized())
        .await
        .inspect(|_| {
            tracing::info!(
                code = %code,
                uid,
                score = submission.score,
                total = submission.total,
                "Submission recorded"
            )
        })
        .inspect_err(|e| tracing::error!(code = %code, uid, "Failed to submit results: {:?}", e))
}

/// All submissions of a session, by student uid. A missing uid means "still taking the exam".
///
/// Entries that do not decode are skipped so one bad record cannot hide the rest.
pub async fn list(
    store: &dyn DocumentStore,
    code: &SessionCode,
) -> Result<HashMap<String, Submission>, AppError> {
    let Some(Value::Object(entries)) = store.get(&paths::submissions(code)).await? else {
        return Ok(HashMap::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|(uid, value)| match serde_json::from_value(value) {
            Ok(submission) => Some((uid, submission)),
            Err(e) => {
                tracing::warn!(code = %code, uid = %uid, "Skipping malformed submission: {:?}", e);
                None
            }
        })
        .collect())
}
