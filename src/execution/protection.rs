//! Protective stop-loss cascade
//!
//! After an entry fills, try a trailing stop first, then a fixed stop.
//! Exhausting both never fails the entry; it raises a manual-intervention alert.

use super::{stop_price_for, Broker, BrokerError, OrderId};
use crate::alert::{Alert, AlertCategory, AlertLevel, AlertSink, RISK_AGENT};
use crate::telemetry::{self, CounterMetric};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of placing protective orders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProtectiveOrderResult {
    /// Trailing stop accepted
    Trailing { order_id: OrderId },
    /// Trailing stop failed, fixed stop accepted
    FixedStop {
        order_id: OrderId,
        stop_price: Decimal,
    },
    /// Both attempts failed
    Failed {
        trailing_error: BrokerError,
        fixed_error: BrokerError,
    },
}

impl ProtectiveOrderResult {
    pub fn is_protected(&self) -> bool {
        !matches!(self, ProtectiveOrderResult::Failed { .. })
    }

    pub fn order_id(&self) -> Option<&str> {
        match self {
            ProtectiveOrderResult::Trailing { order_id }
            | ProtectiveOrderResult::FixedStop { order_id, .. } => Some(order_id),
            ProtectiveOrderResult::Failed { .. } => None,
        }
    }
}

/// Places protective orders through the broker
pub struct StopLossCascade {
    broker: Arc<dyn Broker>,
    alerts: Arc<dyn AlertSink>,
}

impl StopLossCascade {
    pub fn new(broker: Arc<dyn Broker>, alerts: Arc<dyn AlertSink>) -> Self {
        Self { broker, alerts }
    }

    /// Protect a filled position of `qty` units bought at `entry_price`
    pub async fn protect(
        &self,
        symbol: &str,
        qty: u64,
        entry_price: Decimal,
        stop_loss_pct: Decimal,
    ) -> ProtectiveOrderResult {
        let trailing_error = match self
            .broker
            .submit_trailing_stop(symbol, qty, stop_loss_pct)
            .await
        {
            Ok(ack) => {
                telemetry::increment(CounterMetric::ProtectiveOrders, "trailing");
                tracing::info!(symbol, qty, order_id = %ack.order_id, %stop_loss_pct, "Trailing stop placed");
                return ProtectiveOrderResult::Trailing {
                    order_id: ack.order_id,
                };
            }
            Err(e) => {
                tracing::warn!(symbol, error = %e, "Trailing stop failed, falling back to fixed stop");
                e
            }
        };

        let stop_price = stop_price_for(entry_price, stop_loss_pct);
        match self.broker.submit_fixed_stop(symbol, qty, stop_price).await {
            Ok(ack) => {
                telemetry::increment(CounterMetric::ProtectiveOrders, "fixed");
                tracing::info!(symbol, qty, order_id = %ack.order_id, %stop_price, "Fixed stop placed");
                ProtectiveOrderResult::FixedStop {
                    order_id: ack.order_id,
                    stop_price,
                }
            }
            Err(fixed_error) => {
                telemetry::increment(CounterMetric::ProtectiveOrders, "failed");
                tracing::error!(
                    symbol,
                    qty,
                    trailing_error = %trailing_error,
                    fixed_error = %fixed_error,
                    "Position unprotected"
                );
                self.alerts.publish(Alert::new(
                    AlertLevel::Danger,
                    AlertCategory::Error,
                    format!("Stop Loss Failed: {symbol}"),
                    "Position opened but stop loss could not be created. Manual intervention required.",
                    RISK_AGENT,
                ));
                ProtectiveOrderResult::Failed {
                    trailing_error,
                    fixed_error,
                }
            }
        }
    }
}
