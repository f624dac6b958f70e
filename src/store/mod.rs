// src/store/mod.rs

//! Client side of the hierarchical document store.
//!
//! The exam protocol only needs whole-value `get`, `set` and `remove` by path,
//! with last-writer-wins per path and no transactions. Read-modify-write is always
//! spelled out by callers as a `get` followed by a `set`.

pub mod memory;
pub mod rest;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::AppError;

pub use memory::MemoryStore;
pub use rest::RestStore;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the value at `path`, or `None` when nothing is stored there.
    async fn get(&self, path: &str) -> Result<Option<Value>, AppError>;

    /// Replaces the value at `path` wholesale. Writing `null` removes it.
    async fn set(&self, path: &str, value: Value) -> Result<(), AppError>;

    /// Removes `path` and everything below it. Removing an absent path is not an error.
    async fn remove(&self, path: &str) -> Result<(), AppError>;
}

/// Reads and decodes a typed document.
pub async fn read<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    path: &str,
) -> Result<Option<T>, AppError> {
    match store.get(path).await? {
        Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
            tracing::error!(path, "Malformed document: {:?}", e);
            AppError::InternalServerError(format!("Malformed document at {}: {}", path, e))
        }),
        None => Ok(None),
    }
}

/// Encodes and writes a typed document, replacing whatever was at `path`.
pub async fn write<T: Serialize + ?Sized>(
    store: &dyn DocumentStore,
    path: &str,
    value: &T,
) -> Result<(), AppError> {
    let value = serde_json::to_value(value)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    store.set(path, value).await
}
