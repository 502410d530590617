//! Best-effort downstream discussion trigger
//!
//! Fired after an execution so the agent council can discuss the trade.
//! Always spawned detached; failures are logged and never reach the trade.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Trait for discussion trigger implementations
#[async_trait]
pub trait DiscussionTrigger: Send + Sync {
    /// Ask for a discussion of a trade in `symbol`
    async fn trigger(&self, symbol: &str) -> anyhow::Result<()>;
}

/// Calls `{url}?trigger=trade&force=true`
pub struct HttpDiscussionTrigger {
    url: String,
    client: Client,
}

impl HttpDiscussionTrigger {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl DiscussionTrigger for HttpDiscussionTrigger {
    async fn trigger(&self, symbol: &str) -> anyhow::Result<()> {
        tracing::debug!(url = %self.url, symbol, "Triggering trade discussion");

        let response = self
            .client
            .get(&self.url)
            .query(&[("trigger", "trade"), ("force", "true")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Discussion trigger error: {} - {}", status, body);
        }

        Ok(())
    }
}

/// Run the trigger on a detached task
pub fn spawn_discussion(trigger: Arc<dyn DiscussionTrigger>, symbol: String) {
    tokio::spawn(async move {
        if let Err(e) = trigger.trigger(&symbol).await {
            tracing::warn!(symbol = %symbol, error = %e, "Discussion trigger failed");
        }
    });
}
