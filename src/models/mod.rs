// src/models/mod.rs

pub mod quiz;
pub mod schedule;
pub mod session;
pub mod submission;
pub mod upload;
pub mod user;
