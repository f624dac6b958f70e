// src/exam/membership.rs

use serde::Serialize;

use super::code::SessionCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

/// This device's belief about its exam session.
///
/// `Idle` means no session. `Lobby` means joined or hosting but not started
/// locally. `Live` means started: for a teacher, after a successful start; for a
/// student, once the quiz handoff has fired. Reconciled against the store on
/// every poll tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Membership {
    #[default]
    Idle,
    Lobby { code: SessionCode, role: Role },
    Live { code: SessionCode, role: Role },
}

impl Membership {
    pub fn code(&self) -> Option<&SessionCode> {
        match self {
            Membership::Idle => None,
            Membership::Lobby { code, .. } | Membership::Live { code, .. } => Some(code),
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Membership::Idle => None,
            Membership::Lobby { role, .. } | Membership::Live { role, .. } => Some(*role),
        }
    }

    /// Whether the device takes part in a session (and should keep polling).
    pub fn is_active(&self) -> bool {
        !matches!(self, Membership::Idle)
    }

    pub fn is_started(&self) -> bool {
        matches!(self, Membership::Live { .. })
    }

    pub fn is_teacher(&self) -> bool {
        self.role() == Some(Role::Teacher)
    }

    /// The same session and role, marked as started.
    pub fn started(self) -> Self {
        match self {
            Membership::Lobby { code, role } => Membership::Live { code, role },
            other => other,
        }
    }
}
