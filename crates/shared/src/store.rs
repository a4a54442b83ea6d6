use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::{Result, StorageError};

/// Local string key-value persistence (preferences, templates, caches).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

pub async fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };

    let value = serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
        key: key.to_owned(),
        reason: e.to_string(),
    })?;

    Ok(Some(value))
}

pub async fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}
