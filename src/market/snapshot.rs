//! Snapshot providers

use super::{MarketData, PortfolioSnapshot};
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory snapshot provider; `None` reports the feed as unavailable
#[derive(Clone, Default)]
pub struct StaticMarketData {
    snapshot: Arc<RwLock<Option<PortfolioSnapshot>>>,
}

impl StaticMarketData {
    /// Create a provider returning the given snapshot
    pub fn new(snapshot: PortfolioSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Some(snapshot))),
        }
    }

    /// Create a provider that is always unavailable
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Replace the current snapshot
    pub async fn set(&self, snapshot: Option<PortfolioSnapshot>) {
        *self.snapshot.write().await = snapshot;
    }
}

#[async_trait]
impl MarketData for StaticMarketData {
    async fn portfolio_snapshot(&self) -> anyhow::Result<PortfolioSnapshot> {
        self.snapshot
            .read()
            .await
            .clone()
            .ok_or_else(|| anyhow::anyhow!("portfolio snapshot unavailable"))
    }
}

/// Reads the snapshot from a JSON file on every call
pub struct FileMarketData {
    path: PathBuf,
}

impl FileMarketData {
    /// Create a provider backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MarketData for FileMarketData {
    async fn portfolio_snapshot(&self) -> anyhow::Result<PortfolioSnapshot> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading snapshot {}", self.path.display()))?;
        let snapshot = serde_json::from_str(&content)
            .with_context(|| format!("parsing snapshot {}", self.path.display()))?;
        Ok(snapshot)
    }
}
