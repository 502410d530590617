//! Paper and disabled brokers

use super::{Broker, BrokerError, OrderAck, OrderRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// An order accepted by the paper broker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaperOrder {
    Entry {
        order_id: String,
        order: OrderRequest,
        timestamp: DateTime<Utc>,
    },
    TrailingStop {
        order_id: String,
        symbol: String,
        qty: u64,
        trail_percent: Decimal,
        timestamp: DateTime<Utc>,
    },
    FixedStop {
        order_id: String,
        symbol: String,
        qty: u64,
        stop_price: Decimal,
        timestamp: DateTime<Utc>,
    },
}

/// Paper broker that accepts every order immediately
#[derive(Clone, Default)]
pub struct PaperBroker {
    orders: Arc<RwLock<Vec<PaperOrder>>>,
}

impl PaperBroker {
    /// Create a new paper broker
    pub fn new() -> Self {
        Self::default()
    }

    /// All orders accepted so far
    pub async fn orders(&self) -> Vec<PaperOrder> {
        self.orders.read().await.clone()
    }

    fn next_id() -> String {
        format!("paper-{}", Uuid::new_v4())
    }
}

#[async_trait]
impl Broker for PaperBroker {
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, BrokerError> {
        let order_id = Self::next_id();
        self.orders.write().await.push(PaperOrder::Entry {
            order_id: order_id.clone(),
            order: order.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(%order_id, symbol = %order.symbol, qty = order.qty, side = %order.side, "Paper order accepted");
        Ok(OrderAck::new(order_id))
    }

    async fn submit_trailing_stop(
        &self,
        symbol: &str,
        qty: u64,
        trail_percent: Decimal,
    ) -> Result<OrderAck, BrokerError> {
        let order_id = Self::next_id();
        self.orders.write().await.push(PaperOrder::TrailingStop {
            order_id: order_id.clone(),
            symbol: symbol.to_string(),
            qty,
            trail_percent,
            timestamp: Utc::now(),
        });

        tracing::info!(%order_id, symbol, %trail_percent, "Paper trailing stop accepted");
        Ok(OrderAck::new(order_id))
    }

    async fn submit_fixed_stop(
        &self,
        symbol: &str,
        qty: u64,
        stop_price: Decimal,
    ) -> Result<OrderAck, BrokerError> {
        let order_id = Self::next_id();
        self.orders.write().await.push(PaperOrder::FixedStop {
            order_id: order_id.clone(),
            symbol: symbol.to_string(),
            qty,
            stop_price,
            timestamp: Utc::now(),
        });

        tracing::info!(%order_id, symbol, %stop_price, "Paper stop loss accepted");
        Ok(OrderAck::new(order_id))
    }
}

/// Broker used when no brokerage is configured; every call is unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBroker;

impl DisabledBroker {
    fn unavailable() -> BrokerError {
        BrokerError::Unavailable("broker not configured".to_string())
    }
}

#[async_trait]
impl Broker for DisabledBroker {
    fn is_configured(&self) -> bool {
        false
    }

    async fn submit_order(&self, _order: &OrderRequest) -> Result<OrderAck, BrokerError> {
        Err(Self::unavailable())
    }

    async fn submit_trailing_stop(
        &self,
        _symbol: &str,
        _qty: u64,
        _trail_percent: Decimal,
    ) -> Result<OrderAck, BrokerError> {
        Err(Self::unavailable())
    }

    async fn submit_fixed_stop(
        &self,
        _symbol: &str,
        _qty: u64,
        _stop_price: Decimal,
    ) -> Result<OrderAck, BrokerError> {
        Err(Self::unavailable())
    }
}
