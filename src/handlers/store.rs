// src/handlers/store.rs

//! Development document store in the REST dialect spoken by `RestStore`.
//! `GET` returns `null` for absent nodes, `PUT` replaces, `DELETE` removes.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::Value;

use crate::{error::AppError, store::DocumentStore, utils::path::normalize};

fn store_path(raw: &str) -> Result<String, AppError> {
    normalize(raw.strip_suffix(".json").unwrap_or(raw))
}

pub async fn get_node(
    State(store): State<Arc<dyn DocumentStore>>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let path = store_path(&path)?;
    let value = store.get(&path).await?;
    Ok(Json(value.unwrap_or(Value::Null)))
}

pub async fn put_node(
    State(store): State<Arc<dyn DocumentStore>>,
    Path(path): Path<String>,
    Json(value): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let path = store_path(&path)?;
    store.set(&path, value.clone()).await?;
    tracing::debug!(path = %path, "Node written");
    Ok(Json(value))
}

pub async fn delete_node(
    State(store): State<Arc<dyn DocumentStore>>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let path = store_path(&path)?;
    store.remove(&path).await?;
    tracing::debug!(path = %path, "Node removed");
    Ok(Json(Value::Null))
}
