use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

use crate::services::ServiceError;

/// Where uploaded authority documents live.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    async fn save(&self, name: &str, data: &[u8]) -> Result<(), ServiceError>;
    async fn delete(&self, name: &str) -> Result<(), ServiceError>;
}

/// Flat directory on the local filesystem, also served under `/uploads`.
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, ServiceError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }
}

#[async_trait]
impl DocumentStorage for LocalStorage {
    async fn save(&self, name: &str, data: &[u8]) -> Result<(), ServiceError> {
        fs::write(self.base_path.join(name), data).await?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        let path = self.base_path.join(name);
        if path.exists() {
            fs::remove_file(path).await?;
        }
        Ok(())
    }
}
