//! Shared doubles and fixtures

use async_trait::async_trait;
use bond_autopilot::alert::MemoryAlertSink;
use bond_autopilot::automation::{
    AutomationLevel, AutomationOrchestrator, AutomationSettings, Collaborators, DiscussionTrigger,
    Stores,
};
use bond_autopilot::config::EngineConfig;
use bond_autopilot::execution::{Broker, BrokerError, OrderAck, OrderRequest};
use bond_autopilot::market::{PortfolioSnapshot, StaticMarketData};
use bond_autopilot::signal::{Side, Signal};
use bond_autopilot::storage::{Store, StoreError};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Broker whose failures are toggled per test
#[derive(Default)]
pub struct ScriptedBroker {
    pub fail_entry: AtomicBool,
    pub fail_trailing: AtomicBool,
    pub fail_fixed: AtomicBool,
    pub entry_delay: Option<Duration>,
    pub entries: Mutex<Vec<OrderRequest>>,
    pub trailing_stops: Mutex<Vec<(String, u64, Decimal)>>,
    pub fixed_stops: Mutex<Vec<(String, u64, Decimal)>>,
    next_id: AtomicU64,
}

impl ScriptedBroker {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            entry_delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn entries(&self) -> Vec<OrderRequest> {
        self.entries.lock().unwrap().clone()
    }

    fn ack(&self, prefix: &str) -> OrderAck {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        OrderAck::new(format!("{prefix}-{n}"))
    }
}

#[async_trait]
impl Broker for ScriptedBroker {
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, BrokerError> {
        if let Some(delay) = self.entry_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_entry.load(Ordering::SeqCst) {
            return Err(BrokerError::Rejected("insufficient buying power".into()));
        }
        self.entries.lock().unwrap().push(order.clone());
        Ok(self.ack("ord"))
    }

    async fn submit_trailing_stop(
        &self,
        symbol: &str,
        qty: u64,
        trail_percent: Decimal,
    ) -> Result<OrderAck, BrokerError> {
        if self.fail_trailing.load(Ordering::SeqCst) {
            return Err(BrokerError::Rejected("trailing stop not supported".into()));
        }
        self.trailing_stops
            .lock()
            .unwrap()
            .push((symbol.to_string(), qty, trail_percent));
        Ok(self.ack("trail"))
    }

    async fn submit_fixed_stop(
        &self,
        symbol: &str,
        qty: u64,
        stop_price: Decimal,
    ) -> Result<OrderAck, BrokerError> {
        if self.fail_fixed.load(Ordering::SeqCst) {
            return Err(BrokerError::Unavailable("gateway timeout".into()));
        }
        self.fixed_stops
            .lock()
            .unwrap()
            .push((symbol.to_string(), qty, stop_price));
        Ok(self.ack("stop"))
    }
}

/// Discussion trigger that records each call and optionally fails
#[derive(Default)]
pub struct RecordingTrigger {
    pub fail: AtomicBool,
    pub calls: Mutex<Vec<String>>,
}

impl RecordingTrigger {
    pub fn failing() -> Self {
        Self {
            fail: AtomicBool::new(true),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Wait for the detached trigger task to reach `count` calls
    pub async fn wait_for(&self, count: usize) -> Vec<String> {
        for _ in 0..100 {
            if self.calls.lock().unwrap().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.calls()
    }
}

#[async_trait]
impl DiscussionTrigger for RecordingTrigger {
    async fn trigger(&self, symbol: &str) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(symbol.to_string());
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("council unavailable");
        }
        Ok(())
    }
}

/// Store whose saves always fail
pub struct FailingStore;

#[async_trait]
impl<T: Send + Sync + 'static> Store<T> for FailingStore {
    async fn load(&self) -> Result<Option<T>, StoreError> {
        Ok(None)
    }

    async fn save(&self, _value: &T) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only volume",
        )))
    }
}

pub struct Harness {
    pub orchestrator: Arc<AutomationOrchestrator>,
    pub broker: Arc<ScriptedBroker>,
    pub market: StaticMarketData,
    pub alerts: MemoryAlertSink,
    pub stores: Stores,
}

/// Tuesday inside the regular session
pub fn in_session() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap()
}

pub fn snapshot(total: Decimal) -> PortfolioSnapshot {
    PortfolioSnapshot::fallback(total)
}

pub fn settings(level: AutomationLevel) -> AutomationSettings {
    AutomationSettings {
        level,
        ..Default::default()
    }
}

pub fn buy(ticker: &str, confidence: Decimal, price: Decimal) -> Signal {
    Signal::new(ticker, Side::Buy, confidence, "DELPHI", price).with_reasoning("curve steepening")
}

pub fn sell(ticker: &str, confidence: Decimal, price: Decimal) -> Signal {
    Signal::new(ticker, Side::Sell, confidence, "ATHENA", price).with_reasoning("rates peaking")
}

/// The standard TMV buy: 85% confidence at $50 sizes to 200 shares on a
/// $100k portfolio
pub fn tmv_buy() -> Signal {
    buy("TMV", dec!(85), dec!(50))
}

pub async fn harness(settings: AutomationSettings) -> Harness {
    harness_with(settings, ScriptedBroker::default(), Stores::in_memory()).await
}

pub async fn harness_with(
    settings: AutomationSettings,
    broker: ScriptedBroker,
    stores: Stores,
) -> Harness {
    build_harness(settings, broker, stores, None).await
}

/// Harness whose orchestrator fires `trigger` after executions
pub async fn harness_with_discussion(
    settings: AutomationSettings,
    trigger: Arc<RecordingTrigger>,
) -> Harness {
    build_harness(
        settings,
        ScriptedBroker::default(),
        Stores::in_memory(),
        Some(trigger),
    )
    .await
}

async fn build_harness(
    settings: AutomationSettings,
    broker: ScriptedBroker,
    stores: Stores,
    discussion: Option<Arc<RecordingTrigger>>,
) -> Harness {
    let broker = Arc::new(broker);
    let market = StaticMarketData::new(snapshot(dec!(100000)));
    let alerts = MemoryAlertSink::default();

    let orchestrator = AutomationOrchestrator::load(
        EngineConfig::default(),
        Collaborators {
            broker: broker.clone(),
            market: Arc::new(market.clone()),
            alerts: Arc::new(alerts.clone()),
            discussion: discussion.map(|t| t as Arc<dyn DiscussionTrigger>),
        },
        stores.clone(),
        settings,
    )
    .await
    .unwrap();

    Harness {
        orchestrator: Arc::new(orchestrator),
        broker,
        market,
        alerts,
        stores,
    }
}
