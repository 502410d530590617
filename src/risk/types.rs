//! Risk management types

use crate::signal::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason recorded when the kill switch blocks a check
pub const KILL_SWITCH_REASON: &str = "Automation is disabled (kill switch)";

/// Candidate order presented to the risk policy
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCandidate {
    /// Ticker symbol
    pub symbol: String,
    /// Whole-unit quantity
    pub qty: u64,
    /// Trade direction
    pub side: Side,
    /// Quantity times reference price
    pub estimated_value: Decimal,
}

impl OrderCandidate {
    /// Build a candidate valued at the given reference price
    pub fn new(symbol: impl Into<String>, qty: u64, side: Side, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            qty,
            side,
            estimated_value: Decimal::from(qty) * price,
        }
    }
}

/// Verdict of a risk evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskCheckResult {
    /// True when nothing is blocked
    #[serde(rename = "passed")]
    pub allowed: bool,
    /// Soft findings that never veto
    pub warnings: Vec<String>,
    /// Hard limits that veto the order
    pub blocked: Vec<String>,
}

impl RiskCheckResult {
    /// Build a verdict from collected findings
    pub fn from_findings(warnings: Vec<String>, blocked: Vec<String>) -> Self {
        Self {
            allowed: blocked.is_empty(),
            warnings,
            blocked,
        }
    }

    /// The verdict produced while the kill switch is engaged
    pub fn kill_switch() -> Self {
        Self::from_findings(vec![], vec![KILL_SWITCH_REASON.to_string()])
    }

    /// Prepend a caller-side warning (e.g. fallback portfolio values)
    pub fn with_leading_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.insert(0, warning.into());
        self
    }

    /// Blocked reasons joined for display
    pub fn blocked_summary(&self) -> String {
        self.blocked.join(", ")
    }
}

/// Position sizing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizingError {
    /// Computed quantity rounds below one unit
    #[error("Calculated quantity is 0 (position too small): order value {order_value}")]
    PositionTooSmall { order_value: Decimal },
    /// Inputs cannot be sized
    #[error("Cannot size position: {0}")]
    InvalidInput(String),
}
