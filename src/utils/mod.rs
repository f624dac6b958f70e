// src/utils/mod.rs

pub mod path;
pub mod upload;
