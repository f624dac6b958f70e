// src/exam/catalog.rs

use serde_json::Value;

use super::paths;
use crate::{
    error::AppError,
    models::quiz::{HostQuiz, Quiz},
    store::DocumentStore,
};

/// Quizzes authored by `uid`, offered when hosting a session.
pub async fn list_host_quizzes(
    store: &dyn DocumentStore,
    uid: &str,
) -> Result<Vec<HostQuiz>, AppError> {
    let Some(Value::Object(entries)) = store.get(paths::QUIZZES).await? else {
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|(quiz_id, value)| {
            let quiz: Quiz = serde_json::from_value(value).ok()?;
            (quiz.created_by.as_deref() == Some(uid)).then_some(HostQuiz { quiz_id, quiz })
        })
        .collect())
}
