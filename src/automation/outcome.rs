//! Automation results and errors

use super::AutomationSettings;
use crate::execution::{BrokerError, ProtectiveOrderResult};
use crate::proposal::{ProposalError, TradeProposal};
use crate::risk::{DailyStats, RiskCheckResult};
use crate::signal::Side;
use crate::storage::StoreError;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// A submitted entry order and what followed it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub order_id: String,
    pub symbol: String,
    pub side: Side,
    pub qty: u64,
    pub limit_price: Option<Decimal>,
    pub reference_price: Decimal,
    pub risk_check: RiskCheckResult,
    /// Protective order placed after a buy; `None` for sells
    pub protection: Option<ProtectiveOrderResult>,
}

/// What happened to a signal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SignalOutcome {
    /// Failed the confidence or allow-list gates
    Filtered { reason: String },
    /// Sizing produced less than one unit
    PositionTooSmall { reason: String },
    /// Manual mode: alert only
    AlertCreated,
    /// Semi-auto mode: awaiting approval
    ProposalCreated { proposal: TradeProposal },
    /// Kill switch or hard risk limit
    Blocked { risk_check: RiskCheckResult },
    /// Full-auto order accepted
    Executed(ExecutionReport),
    /// Full-auto order refused or broker unreachable
    ExecutionFailed {
        error: BrokerError,
        risk_check: RiskCheckResult,
    },
}

impl SignalOutcome {
    /// Short label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            SignalOutcome::Filtered { .. } => "filtered",
            SignalOutcome::PositionTooSmall { .. } => "position_too_small",
            SignalOutcome::AlertCreated => "alert_created",
            SignalOutcome::ProposalCreated { .. } => "proposal_created",
            SignalOutcome::Blocked { .. } => "blocked",
            SignalOutcome::Executed(_) => "executed",
            SignalOutcome::ExecutionFailed { .. } => "execution_failed",
        }
    }
}

/// Result of approving a proposal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedTrade {
    pub proposal: TradeProposal,
    pub execution: ExecutionReport,
}

/// Read-only view for dashboards
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationStatus {
    pub settings: AutomationSettings,
    pub daily_stats: DailyStats,
    pub pending_proposals: usize,
    pub broker_configured: bool,
    pub win_rate: Decimal,
}

/// Administrative and infrastructure failures
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("Invalid signal: {0}")]
    InvalidSignal(String),
    #[error(transparent)]
    Proposal(#[from] ProposalError),
    #[error(transparent)]
    Broker(#[from] BrokerError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Automation is disabled (kill switch)")]
    KillSwitchActive,
    #[error("Unknown order: {0}")]
    UnknownOrder(String),
}
