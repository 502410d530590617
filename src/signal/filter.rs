//! Signal filtering
//!
//! Allow-list and confidence gates applied before any sizing or risk work.

use super::Signal;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Result of applying filters to a signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterResult {
    /// Signal passed all filters
    Pass,
    /// Signal rejected
    Reject(RejectReason),
}

/// Reason for signal rejection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Confidence below the configured floor
    ConfidenceTooLow { confidence: Decimal, min: Decimal },
    /// Source agent is not allowed to trade
    AgentNotAllowed(String),
    /// Ticker is not allowed to be traded
    TickerNotAllowed(String),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::ConfidenceTooLow { confidence, min } => {
                write!(f, "Confidence {confidence}% below threshold {min}%")
            }
            RejectReason::AgentNotAllowed(agent) => {
                write!(f, "Agent {agent} not in allowed list")
            }
            RejectReason::TickerNotAllowed(ticker) => {
                write!(f, "Ticker {ticker} not in allowed list")
            }
        }
    }
}

/// Signal gates stored with the automation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignalFilters {
    /// Minimum confidence, 0-100
    pub min_confidence: Decimal,
    /// Agents whose signals may trigger trades
    pub allowed_agents: BTreeSet<String>,
    /// Tickers that may be traded
    pub allowed_tickers: BTreeSet<String>,
}

impl Default for SignalFilters {
    fn default() -> Self {
        Self {
            min_confidence: dec!(70),
            allowed_agents: ["DELPHI", "ATHENA"].iter().map(|s| s.to_string()).collect(),
            allowed_tickers: ["TMV", "TBT", "TBF", "TLT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SignalFilters {
    /// Apply all filters to a signal, in confidence/agent/ticker order
    pub fn apply(&self, signal: &Signal) -> FilterResult {
        if signal.confidence < self.min_confidence {
            return FilterResult::Reject(RejectReason::ConfidenceTooLow {
                confidence: signal.confidence,
                min: self.min_confidence,
            });
        }

        if !self.allowed_agents.contains(&signal.agent) {
            return FilterResult::Reject(RejectReason::AgentNotAllowed(signal.agent.clone()));
        }

        if !self.allowed_tickers.contains(&signal.ticker) {
            return FilterResult::Reject(RejectReason::TickerNotAllowed(signal.ticker.clone()));
        }

        FilterResult::Pass
    }
}
