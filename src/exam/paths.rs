// src/exam/paths.rs

//! Store layout used by the exam protocol.

use super::code::SessionCode;

/// Lobby records, keyed by room code.
pub const OPEN: &str = "exams_open";
/// Live records, keyed by room code. The spelling matches existing data.
pub const RUNNING: &str = "exams_runing";
/// Submissions, keyed by room code then student uid.
pub const SUBMISSIONS: &str = "exams_end";
pub const QUIZZES: &str = "quizes";
pub const USERS: &str = "users";

pub fn open(code: &SessionCode) -> String {
    format!("{}/{}", OPEN, code)
}

pub fn running(code: &SessionCode) -> String {
    format!("{}/{}", RUNNING, code)
}

pub fn submissions(code: &SessionCode) -> String {
    format!("{}/{}", SUBMISSIONS, code)
}

pub fn submission(code: &SessionCode, uid: &str) -> String {
    format!("{}/{}/{}", SUBMISSIONS, code, uid)
}

pub fn quiz(quiz_id: &str) -> String {
    format!("{}/{}", QUIZZES, quiz_id)
}

pub fn user(uid: &str) -> String {
    format!("{}/{}", USERS, uid)
}
