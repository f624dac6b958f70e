// src/exam/mod.rs

//! Live exam sessions.
//!
//! A teacher device hosts a session under a short code, student devices join
//! it, and every device runs its own poll loop against the shared document
//! store. There is no server-side coordinator: all state transitions are
//! reads and whole-record writes issued by the devices themselves.

pub mod catalog;
pub mod client;
pub mod code;
pub mod grace;
pub mod membership;
pub mod paths;
pub mod poller;
pub mod roster;
pub mod submission;

pub use client::ExamClient;
pub use code::SessionCode;
pub use grace::{GraceTimer, HttpScheduler, Lifecycle, LocalScheduler, Scheduler};
pub use membership::{Membership, Role};
pub use poller::{ExamEvent, Poller, QuizLaunch};
pub use roster::{RoomView, RosterRow, RowStatus};
