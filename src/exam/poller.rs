// src/exam/poller.rs

use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use super::{
    client::ExamClient,
    code::SessionCode,
    membership::{Membership, Role},
    paths,
    roster::RoomView,
    submission,
};
use crate::{
    error::AppError,
    models::{
        quiz::{Quiz, SelectedPair},
        session::{Direction, ExamSession, ExamType},
        user::{Participant, UserProfile},
    },
    store,
};

/// Parameters handed to the quiz screen when a student's exam goes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizLaunch {
    pub exam_type: ExamType,
    pub word_pairs: Vec<SelectedPair>,
    pub language: Direction,
    pub first_language: String,
    pub second_language: String,
    pub exam_id: SessionCode,
}

impl QuizLaunch {
    pub fn route(&self) -> &'static str {
        self.exam_type.route()
    }
}

/// What a poll tick tells the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExamEvent {
    /// Fresh roster, teacher id and submissions.
    Synced(RoomView),
    /// Route the student into the quiz. Fires once per session.
    Launch(QuizLaunch),
    /// The teacher removed this student.
    Removed,
    /// The session no longer exists.
    SessionEnded,
}

impl ExamClient {
    /// One reconciliation tick against the store.
    ///
    /// The running record takes precedence over the lobby record. A student
    /// whose session vanished, or who is no longer listed, drops back to idle.
    /// The quiz handoff is guarded by the local membership, not by the store,
    /// so re-reading the running record on later ticks never re-routes.
    ///
    /// A failed read leaves membership and room as they were, so the next tick
    /// retries. Once the handoff has fired, roster failures no longer fail the
    /// tick and the `Launch` event is always delivered.
    pub async fn sync(&mut self) -> Result<Vec<ExamEvent>, AppError> {
        let (code, role) = match &self.membership {
            Membership::Idle => return Ok(Vec::new()),
            m => match (m.code().cloned(), m.role()) {
                (Some(code), Some(role)) => (code, role),
                _ => return Ok(Vec::new()),
            },
        };

        let running: Option<ExamSession> = store::read(&*self.store, &paths::running(&code)).await?;
        let open: Option<ExamSession> = store::read(&*self.store, &paths::open(&code)).await?;

        if role == Role::Student {
            match running.as_ref().or(open.as_ref()) {
                None => {
                    tracing::info!(code = %code, "Session is gone");
                    self.reset();
                    return Ok(vec![ExamEvent::SessionEnded]);
                }
                Some(room) if !room.has_member(&self.user_id) => {
                    tracing::info!(code = %code, uid = %self.user_id, "Removed from session");
                    self.reset();
                    return Ok(vec![ExamEvent::Removed]);
                }
                Some(_) => {}
            }
        }

        let mut events = Vec::new();

        if let Some(room) = running {
            if role == Role::Student && !self.membership.is_started() {
                let launch = self.launch(&room).await?;
                tracing::info!(code = %code, route = launch.route(), "Exam started, entering quiz");
                self.membership = std::mem::take(&mut self.membership).started();
                events.push(ExamEvent::Launch(launch));
            }

            let refreshed = match self.participants(&room.users).await {
                Ok(participants) => submission::list(&*self.store, &code)
                    .await
                    .map(|submissions| (participants, submissions)),
                Err(e) => Err(e),
            };

            match refreshed {
                Ok((participants, submissions)) => {
                    self.room.teacher_id = Some(room.teacher_id.clone());
                    self.room.participants = participants;
                    self.room.submissions = submissions;
                }
                // The handoff already happened; keep the previous roster and deliver it.
                Err(e) if !events.is_empty() => {
                    tracing::warn!(code = %code, "Roster refresh failed after launch: {:?}", e);
                }
                Err(e) => return Err(e),
            }
        } else if let Some(room) = open {
            let participants = self.participants(&room.users).await?;
            self.room.teacher_id = Some(room.teacher_id.clone());
            self.room.participants = participants;
        }

        events.push(ExamEvent::Synced(self.room.clone()));
        Ok(events)
    }

    async fn launch(&self, room: &ExamSession) -> Result<QuizLaunch, AppError> {
        let quiz: Quiz = store::read(&*self.store, &paths::quiz(&room.quiz_id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz {} not found", room.quiz_id)))?;

        Ok(QuizLaunch {
            exam_type: room.exam_type,
            word_pairs: quiz.word_pairs.into_iter().map(SelectedPair::from).collect(),
            language: room.direction,
            first_language: quiz.first_language,
            second_language: quiz.second_language,
            exam_id: room.id.clone(),
        })
    }

    async fn participants(&self, uids: &[String]) -> Result<Vec<Participant>, AppError> {
        let mut participants = Vec::with_capacity(uids.len());
        for uid in uids {
            let profile: Option<UserProfile> = store::read(&*self.store, &paths::user(uid)).await?;
            participants.push(Participant::from_profile(uid, profile, &self.public_url));
        }
        Ok(participants)
    }
}

/// Background task running [`ExamClient::sync`] on a fixed interval.
///
/// The first tick runs immediately. The loop ends by itself once the
/// membership is idle (closed, left, kicked, or session gone), when the event
/// receiver is dropped, or when the handle is dropped or stopped.
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    pub fn spawn(
        client: Arc<Mutex<ExamClient>>,
        interval: Duration,
        events: mpsc::Sender<ExamEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let (batch, active) = {
                    let mut client = client.lock().await;
                    if !client.membership().is_active() {
                        break;
                    }
                    let batch = client.sync().await.unwrap_or_else(|e| {
                        tracing::warn!("Poll tick failed, retrying next tick: {:?}", e);
                        Vec::new()
                    });
                    (batch, client.membership().is_active())
                };

                for event in batch {
                    if events.send(event).await.is_err() {
                        tracing::debug!("Event receiver dropped, stopping poller");
                        return;
                    }
                }

                if !active {
                    break;
                }
            }

            tracing::debug!("Poller stopped");
        });

        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stops polling now.
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
