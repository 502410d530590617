//! Position sizing
//!
//! Confidence is bucketed into tiers giving a base percent-of-portfolio
//! target, scaled by a multiplier from the trailing win rate and capped at
//! the configured maximum position size. Both tables are plain lookups so the
//! mapping stays auditable and monotonic in confidence.

use super::{RiskLimits, SizingError};
use crate::signal::Signal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// One row of a threshold table: applies when the input is at or above
/// (confidence) or strictly above (win rate) `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub threshold: Decimal,
    pub value: Decimal,
}

const fn tier(threshold: Decimal, value: Decimal) -> Tier {
    Tier { threshold, value }
}

/// Confidence (inclusive floor) to base position percent, highest first
const CONFIDENCE_TIERS: [Tier; 3] = [
    tier(dec!(90), dec!(15)),
    tier(dec!(80), dec!(10)),
    tier(dec!(70), dec!(5)),
];
const CONFIDENCE_FLOOR_PCT: Decimal = dec!(2);

/// Win rate (exclusive floor) to performance multiplier, highest first
const WIN_RATE_TIERS: [Tier; 2] = [tier(dec!(60), dec!(1.2)), tier(dec!(40), dec!(1.0))];
const WIN_RATE_FLOOR_MULTIPLIER: Decimal = dec!(0.8);

/// Breakdown of a sizing decision, kept for logging and display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizingDecision {
    /// Whole units to trade
    pub qty: u64,
    /// Base percent from the confidence tier
    pub base_pct: Decimal,
    /// Multiplier from the win-rate tier
    pub multiplier: Decimal,
    /// Final percent after scaling and capping
    pub target_pct: Decimal,
    /// Portfolio value allotted to the order, floored to whole currency
    pub order_value: Decimal,
}

/// Tiered position sizer
#[derive(Debug, Clone)]
pub struct PositionSizer {
    confidence_tiers: Vec<Tier>,
    confidence_floor: Decimal,
    win_rate_tiers: Vec<Tier>,
    win_rate_floor: Decimal,
}

impl PositionSizer {
    /// Create a sizer with custom tables. Tables are sorted highest
    /// threshold first.
    pub fn new(
        mut confidence_tiers: Vec<Tier>,
        confidence_floor: Decimal,
        mut win_rate_tiers: Vec<Tier>,
        win_rate_floor: Decimal,
    ) -> Self {
        confidence_tiers.sort_by(|a, b| b.threshold.cmp(&a.threshold));
        win_rate_tiers.sort_by(|a, b| b.threshold.cmp(&a.threshold));
        Self {
            confidence_tiers,
            confidence_floor,
            win_rate_tiers,
            win_rate_floor,
        }
    }

    /// Base percent-of-portfolio for a stated confidence
    pub fn base_percent(&self, confidence: Decimal) -> Decimal {
        self.confidence_tiers
            .iter()
            .find(|t| confidence >= t.threshold)
            .map_or(self.confidence_floor, |t| t.value)
    }

    /// Performance multiplier for a trailing win rate (percent)
    pub fn performance_multiplier(&self, win_rate: Decimal) -> Decimal {
        self.win_rate_tiers
            .iter()
            .find(|t| win_rate > t.threshold)
            .map_or(self.win_rate_floor, |t| t.value)
    }

    /// Size an order for a signal.
    ///
    /// Never rounds up: a sub-unit quantity fails with
    /// [`SizingError::PositionTooSmall`].
    pub fn size(
        &self,
        signal: &Signal,
        win_rate: Decimal,
        limits: &RiskLimits,
        portfolio_value: Decimal,
        current_price: Decimal,
    ) -> Result<SizingDecision, SizingError> {
        if current_price <= Decimal::ZERO {
            return Err(SizingError::InvalidInput(format!(
                "price {current_price} must be positive"
            )));
        }

        let base_pct = self.base_percent(signal.confidence);
        let multiplier = self.performance_multiplier(win_rate);
        let target_pct = (base_pct * multiplier).min(limits.max_position_size);

        let order_value = (portfolio_value * target_pct / dec!(100)).floor();
        let qty = (order_value / current_price).floor().to_u64().unwrap_or(0);

        tracing::debug!(
            confidence = %signal.confidence,
            %base_pct,
            %multiplier,
            %target_pct,
            %order_value,
            qty,
            "Position sizing"
        );

        if qty < 1 {
            return Err(SizingError::PositionTooSmall { order_value });
        }

        Ok(SizingDecision {
            qty,
            base_pct,
            multiplier,
            target_pct,
            order_value,
        })
    }
}

impl Default for PositionSizer {
    fn default() -> Self {
        Self::new(
            CONFIDENCE_TIERS.to_vec(),
            CONFIDENCE_FLOOR_PCT,
            WIN_RATE_TIERS.to_vec(),
            WIN_RATE_FLOOR_MULTIPLIER,
        )
    }
}
