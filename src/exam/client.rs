// src/exam/client.rs

use std::sync::Arc;

use super::{
    code::SessionCode,
    membership::{Membership, Role},
    paths,
    roster::RoomView,
};
use crate::{
    error::AppError,
    models::session::{Direction, ExamSession, ExamType},
    store::{self, DocumentStore},
};

/// One device's participation in a live exam.
///
/// Owns the local [`Membership`] and the last observed [`RoomView`]. Every
/// store mutation is a plain read followed by a whole-record write; nothing is
/// atomic, so concurrent joins or kicks on the same code may overwrite each
/// other. On any store failure the local state is left as it was.
pub struct ExamClient {
    pub(super) store: Arc<dyn DocumentStore>,
    pub(super) user_id: String,
    pub(super) public_url: String,
    pub(super) membership: Membership,
    pub(super) room: RoomView,
}

impl ExamClient {
    /// `public_url` is the upload server base, prefixed to avatar paths.
    pub fn new(store: Arc<dyn DocumentStore>, user_id: &str, public_url: &str) -> Self {
        Self {
            store,
            user_id: user_id.to_string(),
            public_url: public_url.to_string(),
            membership: Membership::Idle,
            room: RoomView::default(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    pub fn room(&self) -> &RoomView {
        &self.room
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Forget everything about the current session.
    pub(super) fn reset(&mut self) {
        self.membership = Membership::Idle;
        self.room = RoomView::default();
    }

    fn teacher_code(&self) -> Result<SessionCode, AppError> {
        match (&self.membership, self.membership.role()) {
            (Membership::Idle, _) => Err(AppError::Forbidden("Not in an exam session".to_string())),
            (m, Some(Role::Teacher)) => m
                .code()
                .cloned()
                .ok_or_else(|| AppError::Forbidden("Not in an exam session".to_string())),
            _ => Err(AppError::Forbidden("Only the teacher can do this".to_string())),
        }
    }

    /// Hosts a new session for `quiz_id` and becomes its teacher.
    pub async fn create_session(
        &mut self,
        quiz_id: &str,
        exam_type: ExamType,
        direction: Direction,
    ) -> Result<SessionCode, AppError> {
        if self.membership.is_active() {
            return Err(AppError::Forbidden("Already in an exam session".to_string()));
        }

        let code = SessionCode::generate();
        let record = ExamSession::open(code.clone(), &self.user_id, quiz_id, exam_type, direction);

        store::write(&*self.store, &paths::open(&code), &record)
            .await
            .map_err(|e| {
                tracing::error!(code = %code, "Failed to create session: {:?}", e);
                e
            })?;

        tracing::info!(code = %code, host = %self.user_id, quiz = quiz_id, "Exam session created");
        self.membership = Membership::Lobby {
            code: code.clone(),
            role: Role::Teacher,
        };
        self.room = RoomView::default();
        Ok(code)
    }

    /// Joins the lobby behind `input` as a student.
    ///
    /// Joining a lobby one already belongs to succeeds without rewriting it.
    pub async fn join_session(&mut self, input: &str) -> Result<SessionCode, AppError> {
        let code: SessionCode = input.parse()?;

        match &self.membership {
            Membership::Idle => {}
            Membership::Lobby { code: current, role: Role::Student } if *current == code => {}
            _ => return Err(AppError::Forbidden("Already in an exam session".to_string())),
        }

        let path = paths::open(&code);
        let mut room: ExamSession = store::read(&*self.store, &path)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid Exam ID.".to_string()))?;

        if room.add_member(&self.user_id) {
            store::write(&*self.store, &path, &room).await?;
            tracing::info!(code = %code, uid = %self.user_id, "Student joined session");
        } else {
            tracing::debug!(code = %code, uid = %self.user_id, "Student already in session");
        }

        self.membership = Membership::Lobby {
            code: code.clone(),
            role: Role::Student,
        };
        Ok(code)
    }

    /// Moves the lobby record to the running collection.
    ///
    /// Returns `Ok(false)` when there is no lobby record left to start (already
    /// started or torn down elsewhere). Between the write and the delete both
    /// records exist for a moment; readers prefer the running one.
    pub async fn start_session(&mut self) -> Result<bool, AppError> {
        let code = self.teacher_code()?;

        let Some(room) = store::read::<ExamSession>(&*self.store, &paths::open(&code)).await? else {
            tracing::warn!(code = %code, "No open session to start");
            return Ok(false);
        };

        store::write(&*self.store, &paths::running(&code), &room).await?;
        self.store.remove(&paths::open(&code)).await?;

        tracing::info!(code = %code, students = room.users.len().saturating_sub(1), "Exam started");
        self.membership = std::mem::take(&mut self.membership).started();
        Ok(true)
    }

    /// Removes `target` from the lobby. Students already in a running exam are unaffected.
    ///
    /// Returns whether the member list changed. The host can never be removed.
    pub async fn kick(&mut self, target: &str) -> Result<bool, AppError> {
        let code = self.teacher_code()?;
        if target == self.user_id {
            return Err(AppError::Forbidden("The teacher cannot be removed".to_string()));
        }
        let path = paths::open(&code);

        let Some(mut room) = store::read::<ExamSession>(&*self.store, &path).await? else {
            return Ok(false);
        };
        if target == room.teacher_id {
            return Err(AppError::Forbidden("The teacher cannot be removed".to_string()));
        }

        if !room.remove_member(target) {
            return Ok(false);
        }

        store::write(&*self.store, &path, &room).await?;
        tracing::info!(code = %code, uid = target, "Participant removed from lobby");
        Ok(true)
    }

    /// Tears the session down for everyone. Closing when idle is a no-op.
    pub async fn close_session(&mut self) -> Result<(), AppError> {
        if !self.membership.is_active() {
            return Ok(());
        }
        let code = self.teacher_code()?;

        delete_records(&*self.store, &code).await?;

        tracing::info!(code = %code, "Exam session closed");
        self.reset();
        Ok(())
    }

    /// Student walks out. While still in the lobby the uid is also dropped from the record.
    pub async fn leave_session(&mut self) -> Result<(), AppError> {
        let (code, started) = match &self.membership {
            Membership::Idle => return Ok(()),
            m if m.is_teacher() => {
                return Err(AppError::Forbidden("The teacher closes the session instead".to_string()));
            }
            m => (m.code().cloned(), m.is_started()),
        };

        if let (Some(code), false) = (code, started) {
            let path = paths::open(&code);
            if let Some(mut room) = store::read::<ExamSession>(&*self.store, &path).await? {
                if room.remove_member(&self.user_id) {
                    store::write(&*self.store, &path, &room).await?;
                }
            }
            tracing::info!(code = %code, uid = %self.user_id, "Student left session");
        }

        self.reset();
        Ok(())
    }
}

/// Deletes both the lobby and the running record of a session. Absent records are fine.
pub async fn delete_records(store: &dyn DocumentStore, code: &SessionCode) -> Result<(), AppError> {
    store.remove(&paths::open(code)).await?;
    store.remove(&paths::running(code)).await
}
