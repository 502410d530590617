//! In-memory store

use super::{Store, StoreError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Store that keeps the value in process memory
#[derive(Clone)]
pub struct MemoryStore<T> {
    value: Arc<RwLock<Option<T>>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            value: Arc::new(RwLock::new(None)),
        }
    }

    /// Store pre-seeded with `value`
    pub fn with_value(value: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(Some(value))),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> Store<T> for MemoryStore<T> {
    async fn load(&self) -> Result<Option<T>, StoreError> {
        Ok(self.value.read().await.clone())
    }

    async fn save(&self, value: &T) -> Result<(), StoreError> {
        *self.value.write().await = Some(value.clone());
        Ok(())
    }
}
