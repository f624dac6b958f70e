// src/models/submission.rs

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// One graded item of a student's answer set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDetail {
    /// The word shown to the student.
    #[serde(rename = "word")]
    pub prompt: String,
    pub correct_answer: String,
    #[serde(default)]
    pub user_answer: String,
    pub is_correct: bool,
}

/// A student's terminal answer set, stored under `exams_end/{code}/{uid}`.
///
/// The alternatives screen stamps `timestamp` (epoch milliseconds) while the
/// writing screen stamps `finishedAt` (ISO 8601). Both are accepted; new
/// submissions carry `timestamp` only. Times are stored at millisecond
/// precision, so [`submit`](crate::exam::submission::submit) truncates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub score: u32,
    pub total: u32,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt", default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub details: Vec<AnswerDetail>,
}

impl Submission {
    /// Builds a submission whose score and total are derived from `details`.
    pub fn graded(details: Vec<AnswerDetail>) -> Self {
        let score = details.iter().filter(|d| d.is_correct).count() as u32;
        Self {
            score,
            total: details.len() as u32,
            timestamp: Some(Utc::now().trunc_subsecs(3)),
            finished_at: None,
            details,
        }
    }

    /// When the student finished, whichever stamp the submitting screen wrote.
    pub fn finished(&self) -> Option<DateTime<Utc>> {
        self.timestamp.or(self.finished_at)
    }

    /// The same submission with its times cut to what the store keeps.
    pub fn normalized(&self) -> Self {
        Self {
            timestamp: self.timestamp.map(|t| t.trunc_subsecs(3)),
            finished_at: self.finished_at.map(|t| t.trunc_subsecs(3)),
            ..self.clone()
        }
    }
}
