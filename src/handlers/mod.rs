// src/handlers/mod.rs

pub mod health;
pub mod store;
pub mod timeout;
pub mod upload;
