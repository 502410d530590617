//! Administrative command implementations

use super::print_json;
use crate::automation::{AutomationLevel, AutomationOrchestrator, AutomationSettings, SettingsUpdate};
use chrono::Utc;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct ProposalsArgs {
    /// Include decided proposals
    #[arg(long)]
    pub all: bool,
}

impl ProposalsArgs {
    pub async fn execute(&self, orchestrator: &AutomationOrchestrator) -> anyhow::Result<()> {
        let proposals = orchestrator.list_proposals(self.all, Utc::now()).await;
        print_json(&proposals)
    }
}

#[derive(Args, Debug)]
pub struct ApproveArgs {
    /// Proposal id
    pub id: String,

    /// Recorded as the approver
    #[arg(long, default_value = "user")]
    pub by: String,
}

impl ApproveArgs {
    pub async fn execute(&self, orchestrator: &AutomationOrchestrator) -> anyhow::Result<()> {
        let approved = orchestrator.approve_proposal(&self.id, &self.by).await?;
        print_json(&approved)
    }
}

#[derive(Args, Debug)]
pub struct RejectArgs {
    /// Proposal id
    pub id: String,

    /// Reason recorded on the proposal
    #[arg(long)]
    pub reason: Option<String>,
}

impl RejectArgs {
    pub async fn execute(&self, orchestrator: &AutomationOrchestrator) -> anyhow::Result<()> {
        let rejected = orchestrator
            .reject_proposal(&self.id, self.reason.clone())
            .await?;
        print_json(&rejected)
    }
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// manual, semi-auto or full-auto
    #[arg(long)]
    pub level: Option<AutomationLevel>,

    /// Turn automation on or off
    #[arg(long)]
    pub enabled: Option<bool>,

    /// Minimum signal confidence
    #[arg(long)]
    pub min_confidence: Option<Decimal>,

    /// Maximum trades per day
    #[arg(long)]
    pub max_daily_trades: Option<u32>,

    /// Maximum single order value
    #[arg(long)]
    pub max_order_value: Option<Decimal>,
}

impl SetArgs {
    /// Build a patch over the current settings
    pub fn to_update(&self, current: &AutomationSettings) -> SettingsUpdate {
        let mut update = SettingsUpdate {
            enabled: self.enabled,
            level: self.level,
            ..Default::default()
        };

        if self.max_daily_trades.is_some() || self.max_order_value.is_some() {
            let mut limits = current.risk_limits.clone();
            if let Some(max) = self.max_daily_trades {
                limits.max_daily_trades = max;
            }
            if let Some(max) = self.max_order_value {
                limits.max_order_value = max;
            }
            update.risk_limits = Some(limits);
        }

        if let Some(min) = self.min_confidence {
            let mut filters = current.signal_filters.clone();
            filters.min_confidence = min;
            update.signal_filters = Some(filters);
        }

        update
    }

    pub async fn execute(&self, orchestrator: &AutomationOrchestrator) -> anyhow::Result<()> {
        let update = self.to_update(&orchestrator.settings().await);
        if update.is_empty() {
            anyhow::bail!("Nothing to update");
        }
        let settings = orchestrator.update_settings(update).await;
        print_json(&settings)
    }
}

#[derive(Args, Debug)]
pub struct OutcomeArgs {
    /// Broker order id of the executed entry
    pub order_id: String,

    /// Realized P&L
    #[arg(long, allow_hyphen_values = true)]
    pub pnl: Decimal,
}

impl OutcomeArgs {
    pub async fn execute(&self, orchestrator: &AutomationOrchestrator) -> anyhow::Result<()> {
        let entry = orchestrator.record_outcome(&self.order_id, self.pnl).await?;
        print_json(&entry)
    }
}
