use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("quota exceeded: {needed} bytes needed, {remaining} remaining")]
    QuotaExceeded { needed: usize, remaining: usize },
}

/// Key-value storage local to this device.
pub trait DeviceStore {
    /// Reads the value stored under `key`, `None` if nothing was ever written
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Replaces the value stored under `key`
    fn set(
        &self,
        key: &str,
        value: String,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[tracing::instrument(name = "FileStore::new", err)]
    pub async fn new(dir: &Path) -> Result<Self, StoreError> {
        tracing::debug!("preparing device store directory");

        if !dir.exists() {
            tokio::fs::create_dir_all(dir).await?;
        }

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DeviceStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }
}

/// In-process store. With a quota set, writes that would exceed it fail
/// the same way a full browser storage area does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    quota: Option<usize>,
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            values: RwLock::default(),
        }
    }
}

impl DeviceStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut values = self.values.write().await;

        if let Some(quota) = self.quota {
            let used: usize = values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = key.len() + value.len();
            let remaining = quota.saturating_sub(used);
            if needed > remaining {
                return Err(StoreError::QuotaExceeded { needed, remaining });
            }
        }

        values.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug)]
pub enum AnyStore {
    File(FileStore),
    Memory(MemoryStore),
}

impl DeviceStore for AnyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Self::File(store) => store.get(key).await,
            Self::Memory(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        match self {
            Self::File(store) => store.set(key, value).await,
            Self::Memory(store) => store.set(key, value).await,
        }
    }
}
