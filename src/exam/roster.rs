// src/exam/roster.rs

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::membership::Role;
use crate::models::{submission::Submission, user::Participant};

/// What the poller last observed about the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoomView {
    pub teacher_id: Option<String>,
    pub participants: Vec<Participant>,
    pub submissions: HashMap<String, Submission>,
}

/// Per-row status shown next to a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RowStatus {
    /// The host's own row.
    Host,
    /// In the lobby, exam not started yet.
    Waiting,
    /// Exam live, no submission yet.
    Pending,
    Finished { score: u32, total: u32 },
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStatus::Host => f.write_str("(Teacher)"),
            RowStatus::Waiting => Ok(()),
            RowStatus::Pending => f.write_str("• Taking Exam..."),
            RowStatus::Finished { score, total } => write!(f, "✓ Score: {}/{}", score, total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterRow {
    pub participant: Participant,
    pub status: RowStatus,
    /// Teacher in the lobby may remove this participant.
    pub can_kick: bool,
    /// Teacher may drill into this participant's answers.
    pub can_view_results: bool,
}

impl RoomView {
    fn is_teacher(&self, uid: &str) -> bool {
        self.teacher_id.as_deref() == Some(uid)
    }

    /// Rows as seen by `viewer_id` in `viewer_role`. Students do not see the teacher row.
    pub fn rows(&self, viewer_id: &str, viewer_role: Role, started: bool) -> Vec<RosterRow> {
        self.participants
            .iter()
            .filter(|p| viewer_role == Role::Teacher || !self.is_teacher(&p.uid))
            .map(|p| {
                let is_teacher = self.is_teacher(&p.uid);
                let submission = self.submissions.get(&p.uid);
                let status = match (is_teacher, started, submission) {
                    (true, _, _) => RowStatus::Host,
                    (false, false, _) => RowStatus::Waiting,
                    (false, true, None) => RowStatus::Pending,
                    (false, true, Some(s)) => RowStatus::Finished {
                        score: s.score,
                        total: s.total,
                    },
                };
                let hosting = viewer_role == Role::Teacher;

                RosterRow {
                    participant: p.clone(),
                    status,
                    can_kick: hosting && !started && p.uid != viewer_id,
                    can_view_results: hosting && !is_teacher && submission.is_some(),
                }
            })
            .collect()
    }

    /// A student's answers, if they have submitted.
    pub fn results_of(&self, uid: &str) -> Option<&Submission> {
        self.submissions.get(uid)
    }
}
