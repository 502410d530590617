//! Execution module
//!
//! Broker abstraction, paper/disabled brokers, and the protective stop cascade

mod paper;
mod protection;
mod types;

pub use paper::{DisabledBroker, PaperBroker, PaperOrder};
pub use protection::{ProtectiveOrderResult, StopLossCascade};
pub use types::{
    limit_price_for, round_to_cents, stop_price_for, BrokerError, OrderAck, OrderId, OrderRequest,
    OrderType, TimeInForce,
};

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for brokerage implementations
#[async_trait]
pub trait Broker: Send + Sync {
    /// Whether orders can actually be routed
    fn is_configured(&self) -> bool {
        true
    }
    /// Submit an entry order
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, BrokerError>;
    /// Submit a GTC sell trailing stop
    async fn submit_trailing_stop(
        &self,
        symbol: &str,
        qty: u64,
        trail_percent: Decimal,
    ) -> Result<OrderAck, BrokerError>;
    /// Submit a GTC sell stop at a fixed price
    async fn submit_fixed_stop(
        &self,
        symbol: &str,
        qty: u64,
        stop_price: Decimal,
    ) -> Result<OrderAck, BrokerError>;
}
