//! Storage module
//!
//! Durable load/save of settings, stats, proposals and the trade journal

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Key-value persistence of a single document
#[async_trait]
pub trait Store<T: Send + Sync>: Send + Sync {
    /// Load the stored value, `None` if nothing has been saved yet
    async fn load(&self) -> Result<Option<T>, StoreError>;
    /// Replace the stored value
    async fn save(&self, value: &T) -> Result<(), StoreError>;
}
