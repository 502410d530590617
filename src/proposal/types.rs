//! Proposal types

use crate::execution::{OrderRequest, OrderType, TimeInForce};
use crate::risk::RiskCheckResult;
use crate::signal::{Side, Signal};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Proposal lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Pending,
    Approved,
    Rejected,
    Executed,
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Approved => "approved",
            ProposalStatus::Rejected => "rejected",
            ProposalStatus::Executed => "executed",
        };
        f.write_str(s)
    }
}

/// The signal a proposal was built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSignal {
    pub ticker: String,
    pub action: Side,
    pub confidence: Decimal,
    #[serde(default)]
    pub reasoning: String,
}

impl From<&Signal> for ProposalSignal {
    fn from(signal: &Signal) -> Self {
        Self {
            ticker: signal.ticker.clone(),
            action: signal.action,
            confidence: signal.confidence,
            reasoning: signal.reasoning.clone(),
        }
    }
}

/// The order that approval submits, priced at creation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedOrder {
    pub symbol: String,
    pub qty: u64,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(default)]
    pub limit_price: Option<Decimal>,
    /// Signal price the order was sized at
    pub reference_price: Decimal,
}

impl ProposedOrder {
    /// Day, extended-hours entry order exactly as proposed
    pub fn to_request(&self) -> OrderRequest {
        OrderRequest {
            symbol: self.symbol.clone(),
            qty: self.qty,
            side: self.side,
            order_type: self.order_type,
            time_in_force: TimeInForce::Day,
            limit_price: self.limit_price,
            extended_hours: true,
        }
    }

    /// Quantity times reference price
    pub fn estimated_value(&self) -> Decimal {
        Decimal::from(self.qty) * self.reference_price
    }
}

/// A proposal awaiting or past a human decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeProposal {
    pub id: String,
    pub agent: String,
    pub signal: ProposalSignal,
    pub order: ProposedOrder,
    pub status: ProposalStatus,
    /// Verdict captured at creation; not re-evaluated on approval
    pub risk_check: RiskCheckResult,
    pub timestamp: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl TradeProposal {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Pending and still inside its TTL
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.status == ProposalStatus::Pending && !self.is_expired(now)
    }

    /// Decided proposals plus open ones; expired-but-pending entries are inert
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status != ProposalStatus::Pending || !self.is_expired(now)
    }
}

/// Proposal lifecycle failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProposalError {
    #[error("Proposal not found: {0}")]
    NotFound(String),
    #[error("Proposal {id} is already {status}")]
    InvalidState { id: String, status: ProposalStatus },
    #[error("Proposal {id} expired at {expired_at}")]
    Expired {
        id: String,
        expired_at: DateTime<Utc>,
    },
}
