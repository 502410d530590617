//! Run command implementation

use super::print_json;
use crate::automation::{AutomationOrchestrator, ProcessorError, SignalProcessor};
use crate::config::EngineConfig;
use crate::signal::Signal;
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON file holding an array of signals
    #[arg(long, default_value = "./data/signals.json")]
    pub signals: PathBuf,

    /// Ignore the minimum interval between runs
    #[arg(long)]
    pub force: bool,

    /// Re-read the file and run every N seconds until interrupted
    #[arg(long)]
    pub every: Option<u64>,
}

impl RunArgs {
    pub async fn execute(
        &self,
        orchestrator: Arc<AutomationOrchestrator>,
        engine: &EngineConfig,
    ) -> anyhow::Result<()> {
        let processor = SignalProcessor::new(
            orchestrator,
            chrono::Duration::seconds(engine.signal_min_interval_secs as i64),
            engine.signal_history_limit,
        );

        let Some(every) = self.every else {
            return self.run_once(&processor, self.force).await;
        };

        tracing::info!(every_secs = every, file = %self.signals.display(), "Starting signal loop");
        let mut interval = tokio::time::interval(Duration::from_secs(every.max(1)));
        let mut first = true;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.run_once(&processor, self.force && first).await {
                        tracing::error!(error = %e, "Signal run failed");
                    }
                    first = false;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!(runs = processor.run_count().await, "Signal loop stopped");
                    return Ok(());
                }
            }
        }
    }

    async fn run_once(&self, processor: &SignalProcessor, force: bool) -> anyhow::Result<()> {
        let signals = load_signals(&self.signals).await?;
        match processor.run(signals, force).await {
            Ok(summary) => print_json(&summary),
            Err(ProcessorError::TooSoon { next_run_in_secs }) => {
                tracing::info!(next_run_in_secs, "Skipping run, too soon");
                Ok(())
            }
        }
    }
}

async fn load_signals(path: &Path) -> anyhow::Result<Vec<Signal>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&content)?)
}
