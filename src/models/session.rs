// src/models/session.rs

use serde::{Deserialize, Serialize};

use crate::exam::code::SessionCode;

/// How students answer during the exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamType {
    /// Students type the translation.
    Writing,
    /// Students pick the translation among alternatives.
    Alternatives,
}

impl ExamType {
    /// Screen a student is routed to once the exam is live.
    pub fn route(self) -> &'static str {
        match self {
            ExamType::Writing => "/write",
            ExamType::Alternatives => "/alternatives",
        }
    }
}

/// Which side of each word pair students translate into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    First,
    Second,
    Both,
}

/// A session record, stored under `exams_open/{code}` while in the lobby and
/// copied verbatim to `exams_runing/{code}` when the teacher starts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSession {
    pub id: SessionCode,

    #[serde(rename = "quizID")]
    pub quiz_id: String,

    #[serde(rename = "type")]
    pub exam_type: ExamType,

    #[serde(rename = "language")]
    pub direction: Direction,

    /// Participant ids in join order. The store drops empty lists, hence the default.
    #[serde(default)]
    pub users: Vec<String>,

    #[serde(rename = "teacherId")]
    pub teacher_id: String,
}

impl ExamSession {
    /// A fresh lobby record whose only member is the host.
    pub fn open(
        id: SessionCode,
        host_id: &str,
        quiz_id: &str,
        exam_type: ExamType,
        direction: Direction,
    ) -> Self {
        Self {
            id,
            quiz_id: quiz_id.to_string(),
            exam_type,
            direction,
            users: vec![host_id.to_string()],
            teacher_id: host_id.to_string(),
        }
    }

    pub fn has_member(&self, uid: &str) -> bool {
        self.users.iter().any(|u| u == uid)
    }

    /// Appends `uid` unless it is already a member. Returns whether the list changed.
    pub fn add_member(&mut self, uid: &str) -> bool {
        if self.has_member(uid) {
            return false;
        }
        self.users.push(uid.to_string());
        true
    }

    /// Drops `uid` from the member list. Returns whether the list changed.
    pub fn remove_member(&mut self, uid: &str) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u != uid);
        self.users.len() != before
    }
}
