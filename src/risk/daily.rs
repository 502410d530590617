//! Daily trading ledger and drawdown tracking

use crate::signal::Side;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// An executed trade, appended to the daily ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub timestamp: DateTime<Utc>,
    pub ticker: String,
    pub side: Side,
    pub qty: u64,
    pub price: Decimal,
}

/// One calendar day of trading activity.
///
/// `peak_portfolio_value`, `current_drawdown` and `max_drawdown` belong to the
/// drawdown epoch and survive day rollover; the counters are per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: NaiveDate,
    #[serde(default)]
    pub trades_count: u32,
    #[serde(default, rename = "totalPnL")]
    pub total_pnl: Decimal,
    #[serde(default)]
    pub peak_portfolio_value: Decimal,
    #[serde(default)]
    pub current_drawdown: Decimal,
    #[serde(default)]
    pub max_drawdown: Decimal,
    #[serde(default)]
    pub trades: Vec<TradeRecord>,
}

impl DailyStats {
    /// Empty ledger for a day with no peak recorded
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            trades_count: 0,
            total_pnl: dec!(0),
            peak_portfolio_value: dec!(0),
            current_drawdown: dec!(0),
            max_drawdown: dec!(0),
            trades: vec![],
        }
    }
}

/// Owns the [`DailyStats`] record and applies rollover and drawdown rules.
///
/// The tracker is purely in-memory; callers persist [`DailyStatsTracker::stats`]
/// after every mutating call.
#[derive(Debug, Clone)]
pub struct DailyStatsTracker {
    stats: DailyStats,
}

impl DailyStatsTracker {
    /// Wrap a loaded record
    pub fn new(stats: DailyStats) -> Self {
        Self { stats }
    }

    /// Fresh tracker for the day of `now`
    pub fn starting(now: DateTime<Utc>) -> Self {
        Self::new(DailyStats::new(now.date_naive()))
    }

    pub fn stats(&self) -> &DailyStats {
        &self.stats
    }

    /// Start a new day if `now` is past the stored date. Daily counters reset;
    /// the peak and drawdown figures carry forward so drawdown is measured
    /// continuously across days. Returns true when a rollover happened.
    pub fn rollover_if_new_day(&mut self, now: DateTime<Utc>) -> bool {
        let today = now.date_naive();
        if self.stats.date == today {
            return false;
        }

        tracing::info!(
            previous = %self.stats.date,
            %today,
            peak = %self.stats.peak_portfolio_value,
            "Daily stats rollover"
        );

        self.stats = DailyStats {
            peak_portfolio_value: self.stats.peak_portfolio_value,
            current_drawdown: self.stats.current_drawdown,
            max_drawdown: self.stats.max_drawdown,
            ..DailyStats::new(today)
        };
        true
    }

    /// Append an executed trade
    pub fn record_trade(&mut self, trade: TradeRecord) {
        self.stats.trades_count += 1;
        self.stats.trades.push(trade);
    }

    /// Add realized P&L from a closed trade
    pub fn record_realized_pnl(&mut self, pnl: Decimal) {
        self.stats.total_pnl += pnl;
    }

    /// Fold a fresh portfolio value into the peak and drawdown figures
    pub fn update_drawdown(&mut self, current_value: Decimal) {
        let stats = &mut self.stats;

        if stats.peak_portfolio_value.is_zero() || current_value > stats.peak_portfolio_value {
            stats.peak_portfolio_value = current_value;
            tracing::debug!(peak = %current_value, "New peak portfolio value");
        }

        if stats.peak_portfolio_value > Decimal::ZERO {
            let drawdown = (stats.peak_portfolio_value - current_value)
                / stats.peak_portfolio_value
                * dec!(100);
            stats.current_drawdown = drawdown.max(Decimal::ZERO);

            if stats.current_drawdown > stats.max_drawdown {
                stats.max_drawdown = stats.current_drawdown;
                tracing::info!(max_drawdown = %stats.max_drawdown, "New max drawdown");
            }
        }
    }

    /// Start a new epoch: everything cleared, including the peak
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.stats = DailyStats::new(now.date_naive());
    }
}
