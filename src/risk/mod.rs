//! Risk management module
//!
//! Position sizing, pre-trade limits, and the daily drawdown ledger

mod daily;
mod limits;
mod sizing;
mod types;

pub use daily::{DailyStats, DailyStatsTracker, TradeRecord};
pub use limits::{RiskLimits, RiskPolicy, TradingWindow};
pub use sizing::{PositionSizer, SizingDecision, Tier};
pub use types::{OrderCandidate, RiskCheckResult, SizingError, KILL_SWITCH_REASON};
