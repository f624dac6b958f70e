// src/store/memory.rs

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::{error::AppError, utils::path::segments};

/// In-process hierarchical JSON tree.
///
/// Mirrors the semantics of a realtime-database style store: writing a node
/// creates its ancestors, removing the last child of a node removes the node,
/// and `null` is never stored.
#[derive(Debug, Default)]
pub struct MemoryStore {
    root: RwLock<Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Value::Null),
        }
    }
}

/// Removes the node at `keys` below `node`. Returns true when `node` became empty.
fn remove_at(node: &mut Value, keys: &[&str]) -> bool {
    let Some((first, rest)) = keys.split_first() else {
        return true;
    };

    if let Value::Object(map) = node {
        let drop_child = match map.get_mut(*first) {
            Some(child) => remove_at(child, rest),
            None => false,
        };
        if drop_child {
            map.remove(*first);
        }
        map.is_empty()
    } else {
        false
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, AppError> {
        let keys = segments(path)?;
        let root = self.root.read().await;

        let mut node = &*root;
        for key in keys {
            match node.get(key) {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }

        Ok(match node {
            Value::Null => None,
            other => Some(other.clone()),
        })
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), AppError> {
        if value.is_null() || value.as_object().is_some_and(Map::is_empty) {
            return self.remove(path).await;
        }

        let keys = segments(path)?;
        let mut root = self.root.write().await;

        let Some((last, parents)) = keys.split_last() else {
            *root = value;
            return Ok(());
        };

        let mut node = &mut *root;
        for key in parents {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            node = node
                .as_object_mut()
                .ok_or_else(|| AppError::InternalServerError("Store node is not an object".to_string()))?
                .entry(key.to_string())
                .or_insert(Value::Null);
        }

        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        if let Value::Object(map) = node {
            map.insert(last.to_string(), value);
        }

        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), AppError> {
        let keys = segments(path)?;
        let mut root = self.root.write().await;

        if remove_at(&mut root, &keys) {
            *root = Value::Null;
        }

        Ok(())
    }
}
