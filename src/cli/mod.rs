//! CLI interface for bond-autopilot
//!
//! Provides subcommands for:
//! - `status`: Show settings, today's stats and pending proposals
//! - `signal`: Process a single signal
//! - `run`: Process a batch of signals from a JSON file
//! - `proposals`, `approve`, `reject`: Proposal administration
//! - `kill-switch`, `set`, `reset-stats`: Automation administration
//! - `outcome`: Record realized P&L for an executed order
//! - `config`: Show configuration

mod admin;
mod run;
mod signal;

pub use admin::{ApproveArgs, OutcomeArgs, ProposalsArgs, RejectArgs, SetArgs};
pub use run::RunArgs;
pub use signal::SignalArgs;

use crate::alert::LogAlertSink;
use crate::automation::{
    AutomationOrchestrator, Collaborators, DiscussionTrigger, HttpDiscussionTrigger, Stores,
};
use crate::config::{Config, ExecutionMode};
use crate::execution::{Broker, DisabledBroker, PaperBroker};
use crate::market::{FileMarketData, MarketData, StaticMarketData};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "bond-autopilot")]
#[command(about = "Automation and risk decision engine for bond-ETF trading signals")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show settings, today's stats and pending proposals
    Status,
    /// Process a single signal
    Signal(SignalArgs),
    /// Process signals from a JSON file, optionally on an interval
    Run(RunArgs),
    /// List proposals
    Proposals(ProposalsArgs),
    /// Approve a pending proposal and submit its order
    Approve(ApproveArgs),
    /// Reject a proposal
    Reject(RejectArgs),
    /// Halt all automated trading
    KillSwitch,
    /// Update automation settings
    Set(SetArgs),
    /// Reset today's stats and the drawdown peak
    ResetStats,
    /// Record realized P&L for an executed order
    Outcome(OutcomeArgs),
    /// Show configuration
    Config,
}

/// Wire collaborators and stores from configuration and load state
pub async fn build_orchestrator(config: &Config) -> anyhow::Result<Arc<AutomationOrchestrator>> {
    let broker: Arc<dyn Broker> = match config.execution.mode {
        ExecutionMode::Paper => Arc::new(PaperBroker::new()),
        ExecutionMode::Disabled => Arc::new(DisabledBroker),
    };

    let market: Arc<dyn MarketData> = match &config.market.snapshot_path {
        Some(path) => Arc::new(FileMarketData::new(path)),
        None => Arc::new(StaticMarketData::unavailable()),
    };

    let discussion: Option<Arc<dyn DiscussionTrigger>> = match &config.execution.discussion_url {
        Some(url) => Some(Arc::new(HttpDiscussionTrigger::new(url.clone())?)),
        None => None,
    };

    let collaborators = Collaborators {
        broker,
        market,
        alerts: Arc::new(LogAlertSink),
        discussion,
    };

    let orchestrator = AutomationOrchestrator::load(
        config.engine.clone(),
        collaborators,
        Stores::json(&config.storage),
        config.automation.clone(),
    )
    .await?;
    Ok(Arc::new(orchestrator))
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
