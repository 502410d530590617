//! Risk limits and the pre-trade policy

use super::{DailyStats, OrderCandidate, RiskCheckResult};
use crate::automation::AutomationSettings;
use crate::market::PortfolioSnapshot;
use crate::signal::Side;
use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fraction of the drawdown limit at which an early warning is raised
const DRAWDOWN_WARNING_BAND: Decimal = dec!(0.8);

/// Numeric policy knobs; percentages are in percent units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskLimits {
    /// Maximum position as percentage of portfolio
    pub max_position_size: Decimal,
    /// Maximum trades per day
    pub max_daily_trades: u32,
    /// Maximum daily loss as percentage of portfolio
    pub max_daily_loss: Decimal,
    /// Maximum peak-to-trough drawdown percentage
    pub max_drawdown: Decimal,
    /// Maximum single order value
    pub max_order_value: Decimal,
    /// Minimum cash to keep, percentage of portfolio
    pub min_cash_reserve: Decimal,
    /// Warn when trading outside the regular session
    pub trading_hours_only: bool,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_position_size: dec!(25),
            max_daily_trades: 10,
            max_daily_loss: dec!(5),
            max_drawdown: dec!(15),
            max_order_value: dec!(10000),
            min_cash_reserve: dec!(20),
            trading_hours_only: true,
        }
    }
}

/// Regular session band in UTC, open inclusive, close exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl TradingWindow {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        Self { open, close }
    }

    /// Whether the wall-clock time of `now` falls inside the band
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let time = now.time();
        time >= self.open && time < self.close
    }
}

impl Default for TradingWindow {
    fn default() -> Self {
        // NYSE 9:30-16:00 ET
        Self {
            open: NaiveTime::from_hms_opt(14, 30, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(21, 0, 0).unwrap_or_default(),
        }
    }
}

fn percent_of(value: Decimal, pct: Decimal) -> Decimal {
    value * pct / dec!(100)
}

/// Pure pre-trade risk evaluation.
///
/// Every check contributes independently to `warnings` or `blocked`, except
/// the kill switch, which short-circuits. Evaluating never mutates state, so
/// identical inputs always produce identical verdicts.
#[derive(Debug, Clone, Default)]
pub struct RiskPolicy {
    window: TradingWindow,
}

impl RiskPolicy {
    /// Create a policy with the given trading window
    pub fn new(window: TradingWindow) -> Self {
        Self { window }
    }

    /// Evaluate a candidate order against the configured limits
    pub fn evaluate(
        &self,
        settings: &AutomationSettings,
        stats: &DailyStats,
        portfolio: &PortfolioSnapshot,
        order: &OrderCandidate,
        now: DateTime<Utc>,
    ) -> RiskCheckResult {
        if !settings.enabled {
            return RiskCheckResult::kill_switch();
        }

        let limits = &settings.risk_limits;
        let mut warnings = Vec::new();
        let mut blocked = Vec::new();
        let total_value = portfolio.total_value;

        if stats.trades_count >= limits.max_daily_trades {
            blocked.push(format!(
                "Daily trade limit reached ({})",
                limits.max_daily_trades
            ));
        }

        let max_loss_amount = percent_of(total_value, limits.max_daily_loss);
        if stats.total_pnl < Decimal::ZERO && stats.total_pnl.abs() >= max_loss_amount {
            blocked.push(format!(
                "Daily loss limit reached ({}% = ${:.2})",
                limits.max_daily_loss, max_loss_amount
            ));
        }

        if stats.current_drawdown >= limits.max_drawdown {
            blocked.push(format!(
                "Max drawdown limit reached: {:.1}% (limit: {}%)",
                stats.current_drawdown, limits.max_drawdown
            ));
        } else if stats.current_drawdown >= limits.max_drawdown * DRAWDOWN_WARNING_BAND {
            warnings.push(format!(
                "Approaching drawdown limit: {:.1}% (limit: {}%)",
                stats.current_drawdown, limits.max_drawdown
            ));
        }

        if order.estimated_value > limits.max_order_value {
            blocked.push(format!(
                "Order value ${} exceeds limit ${}",
                order.estimated_value, limits.max_order_value
            ));
        }

        if total_value <= Decimal::ZERO {
            blocked.push("Portfolio value unavailable".to_string());
        } else {
            let position_pct = order.estimated_value / total_value * dec!(100);
            if position_pct > limits.max_position_size {
                blocked.push(format!(
                    "Position size {:.1}% exceeds limit {}%",
                    position_pct, limits.max_position_size
                ));
            }

            if let Some(existing) = portfolio.position(&order.symbol) {
                let total_pct =
                    (existing.market_value + order.estimated_value) / total_value * dec!(100);
                if total_pct > limits.max_position_size {
                    warnings.push(format!(
                        "Total {} exposure would be {:.1}% (limit: {}%)",
                        order.symbol, total_pct, limits.max_position_size
                    ));
                }
            }
        }

        if limits.trading_hours_only && !self.window.contains(now) {
            warnings.push("Outside regular trading hours".to_string());
        }

        if order.side == Side::Buy {
            let cash_after = portfolio.cash - order.estimated_value;
            let min_cash = percent_of(total_value, limits.min_cash_reserve);
            if cash_after < min_cash {
                blocked.push(format!(
                    "Would breach minimum cash reserve ({}% = ${:.2})",
                    limits.min_cash_reserve, min_cash
                ));
            }
        }

        RiskCheckResult::from_findings(warnings, blocked)
    }
}
