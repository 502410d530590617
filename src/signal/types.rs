//! Signal types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy shares
    Buy,
    /// Sell shares
    Sell,
}

impl Side {
    /// Uppercase label used in alert titles
    pub fn label(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(format!("unknown side '{other}' (expected buy or sell)")),
        }
    }
}

/// A directional trading suggestion produced by an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    /// Ticker to trade
    pub ticker: String,
    /// Trade direction
    pub action: Side,
    /// Stated confidence, 0-100
    pub confidence: Decimal,
    /// Free-form reasoning from the agent
    #[serde(default)]
    pub reasoning: String,
    /// Source agent name
    pub agent: String,
    /// Reference price at signal time
    pub current_price: Decimal,
}

impl Signal {
    /// Create a new signal
    pub fn new(
        ticker: impl Into<String>,
        action: Side,
        confidence: Decimal,
        agent: impl Into<String>,
        current_price: Decimal,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            action,
            confidence,
            reasoning: String::new(),
            agent: agent.into(),
            current_price,
        }
    }

    /// Attach reasoning text
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    /// Check the signal is well-formed before any policy work
    pub fn validate(&self) -> Result<(), String> {
        if self.ticker.trim().is_empty() {
            return Err("ticker is empty".to_string());
        }
        if self.current_price <= Decimal::ZERO {
            return Err(format!("price {} must be positive", self.current_price));
        }
        if self.confidence < Decimal::ZERO || self.confidence > Decimal::ONE_HUNDRED {
            return Err(format!("confidence {} outside 0-100", self.confidence));
        }
        Ok(())
    }
}
