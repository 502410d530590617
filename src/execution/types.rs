//! Execution types

use crate::signal::Side;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broker-assigned order identifier
pub type OrderId = String;

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Market order (immediate execution)
    Market,
    /// Limit order (price specified)
    Limit,
    /// Stop order triggered at a fixed price
    Stop,
    /// Stop order trailing the best price by a percentage
    TrailingStop,
}

/// Order lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Expires at the end of the session
    Day,
    /// Good until cancelled
    Gtc,
}

/// An entry order to be submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub symbol: String,
    pub qty: u64,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub limit_price: Option<Decimal>,
    pub extended_hours: bool,
}

impl OrderRequest {
    /// Day limit order eligible for extended hours
    pub fn limit_entry(symbol: impl Into<String>, qty: u64, side: Side, limit_price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            qty,
            side,
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::Day,
            limit_price: Some(limit_price),
            extended_hours: true,
        }
    }
}

/// Broker acknowledgement of an accepted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub order_id: OrderId,
    pub submitted_at: DateTime<Utc>,
}

impl OrderAck {
    pub fn new(order_id: impl Into<OrderId>) -> Self {
        Self {
            order_id: order_id.into(),
            submitted_at: Utc::now(),
        }
    }
}

/// Broker failures
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BrokerError {
    /// Brokerage unreachable or not configured
    #[error("Broker unavailable: {0}")]
    Unavailable(String),
    /// Brokerage refused the order
    #[error("Broker rejected order: {0}")]
    Rejected(String),
}

/// Round a price to cents, half away from zero
pub fn round_to_cents(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Marketable limit price: `buffer_pct` above the reference for buys,
/// below it for sells
pub fn limit_price_for(side: Side, reference: Decimal, buffer_pct: Decimal) -> Decimal {
    let factor = match side {
        Side::Buy => Decimal::ONE + buffer_pct / dec!(100),
        Side::Sell => Decimal::ONE - buffer_pct / dec!(100),
    };
    round_to_cents(reference * factor)
}

/// Fixed stop price `stop_loss_pct` below the entry
pub fn stop_price_for(entry_price: Decimal, stop_loss_pct: Decimal) -> Decimal {
    round_to_cents(entry_price * (Decimal::ONE - stop_loss_pct / dec!(100)))
}
