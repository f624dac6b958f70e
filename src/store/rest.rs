// src/store/rest.rs

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use super::DocumentStore;
use crate::{error::AppError, utils::path::normalize};

/// REST client for a realtime-database style store.
///
/// Every node is addressed as `{base}/{path}.json`: `GET` reads it (`null` when
/// absent), `PUT` replaces it and `DELETE` removes it. The companion server's
/// `/db` routes speak the same dialect.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base: Url,
}

impl RestStore {
    pub fn new(base: &str) -> Result<Self, AppError> {
        // A trailing slash makes `Url::join` append instead of replacing the last segment.
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        let base = Url::parse(&base)
            .map_err(|e| AppError::BadRequest(format!("Invalid store URL: {}", e)))?;

        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    fn node_url(&self, path: &str) -> Result<Url, AppError> {
        let path = normalize(path)?;
        let node = if path.is_empty() {
            ".json".to_string()
        } else {
            format!("{}.json", path)
        };
        self.base
            .join(&node)
            .map_err(|e| AppError::BadRequest(format!("Invalid store path: {}", e)))
    }
}

fn check(status: StatusCode, path: &str) -> Result<(), AppError> {
    if status.is_success() {
        return Ok(());
    }
    tracing::warn!(path, %status, "Store request rejected");
    if status.is_client_error() {
        Err(AppError::BadRequest(format!("Store rejected {}: {}", path, status)))
    } else {
        Err(AppError::StoreUnavailable(format!("Store failed on {}: {}", path, status)))
    }
}

#[async_trait]
impl DocumentStore for RestStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, AppError> {
        let response = self.client.get(self.node_url(path)?).send().await?;
        check(response.status(), path)?;

        let value: Value = response.json().await?;
        Ok(match value {
            Value::Null => None,
            other => Some(other),
        })
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), AppError> {
        let response = self
            .client
            .put(self.node_url(path)?)
            .json(&value)
            .send()
            .await?;
        check(response.status(), path)
    }

    async fn remove(&self, path: &str) -> Result<(), AppError> {
        let response = self.client.delete(self.node_url(path)?).send().await?;
        check(response.status(), path)
    }
}
