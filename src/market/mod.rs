//! Market data module
//!
//! Read-only portfolio snapshots consumed by sizing and risk evaluation

mod snapshot;

pub use snapshot::{FileMarketData, StaticMarketData};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A held position in the portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Ticker symbol
    pub symbol: String,
    /// Current market value
    pub market_value: Decimal,
    /// Shares held
    pub qty: Decimal,
}

/// Point-in-time view of the account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    /// Total account value
    pub total_value: Decimal,
    /// Available cash
    pub cash: Decimal,
    /// Open positions
    #[serde(default)]
    pub positions: Vec<Holding>,
}

impl PortfolioSnapshot {
    /// Conservative stand-in used when the live snapshot is unavailable:
    /// all value assumed to be cash, no positions.
    pub fn fallback(total_value: Decimal) -> Self {
        Self {
            total_value,
            cash: total_value,
            positions: vec![],
        }
    }

    /// Find an existing holding by symbol
    pub fn position(&self, symbol: &str) -> Option<&Holding> {
        self.positions.iter().find(|p| p.symbol == symbol)
    }
}

/// Trait for portfolio data providers
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch the current portfolio snapshot
    async fn portfolio_snapshot(&self) -> anyhow::Result<PortfolioSnapshot>;
}
